//! Travel-time matrices.
//!
//! Provides a dense, possibly asymmetric travel-time matrix in minutes.

mod matrix;

pub use matrix::TravelTimeMatrix;
