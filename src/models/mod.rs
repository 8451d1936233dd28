//! Domain model types for shift-constrained routing.
//!
//! Provides stops with service times and day/night shifts, routes as
//! depot-anchored stop sequences, the solution partition, and the move
//! descriptors the local search operates with.

mod moves;
mod route;
mod solution;
mod stop;

pub use moves::{Move, MoveKind};
pub use route::{Route, RouteId};
pub use solution::{Assignment, Solution, Violation, ViolationType};
pub use stop::{Shift, Stop};
