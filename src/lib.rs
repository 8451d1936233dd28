//! # route-vnd
//!
//! Local-search improvement of shift-constrained vehicle routes by Variable
//! Neighborhood Descent.
//!
//! A [`Solution`](models::Solution) assigns stops to named routes that start
//! and end at a depot. The objective is the sum of route durations (travel
//! plus service time, in minutes), and every route must stay within a shift
//! cap. Six neighborhoods (intra-route swap, shift and 2-opt; inter-route
//! shift, swap and 2-opt*) evaluate moves incrementally against cached route
//! durations, and the descent applies them until none improves.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Stop, Route, Solution, Move)
//! - [`distance`] — Travel time matrix
//! - [`evaluation`] — Route durations, cap violations and reports
//! - [`constructive`] — Greedy per-shift initial routes
//! - [`local_search`] — Neighborhoods and the single-neighborhood driver
//! - [`vnd`] — Variable Neighborhood Descent controller
//! - [`acceptance`] — Move acceptance strategies (greedy, annealing)
//! - [`compatibility`] — Route-pair predicates for inter-route moves
//! - [`error`] — Configuration errors
//!
//! ## Example
//!
//! ```
//! use route_vnd::distance::TravelTimeMatrix;
//! use route_vnd::models::{Assignment, Shift, Solution, Stop};
//! use route_vnd::vnd::{VndConfig, VndRunner};
//!
//! let tt = TravelTimeMatrix::from_rows(&[
//!     vec![0.0, 10.0, 12.0, 30.0],
//!     vec![10.0, 0.0, 3.0, 25.0],
//!     vec![12.0, 3.0, 0.0, 20.0],
//!     vec![30.0, 25.0, 20.0, 0.0],
//! ])
//! .unwrap();
//! let stops = [
//!     Stop::new(1, 5.0, Shift::Day),
//!     Stop::new(2, 5.0, Shift::Day),
//!     Stop::new(3, 5.0, Shift::Day),
//! ];
//! let assignments = [
//!     Assignment::new(2, "R1", 1),
//!     Assignment::new(3, "R1", 2),
//!     Assignment::new(1, "R1", 3),
//! ];
//! let sol = Solution::from_assignments(0, &tt, &stops, &assignments).unwrap();
//!
//! let result = VndRunner::run(sol, &tt, &VndConfig::default()).unwrap();
//! assert!(result.objective <= result.initial_objective);
//! assert_eq!(result.solution.to_assignments().len(), 3);
//! ```

pub mod acceptance;
pub mod compatibility;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod vnd;
