//! Variable Neighborhood Descent (VND).
//!
//! A deterministic descent over an ordered list of neighborhoods. Each
//! neighborhood is searched by the [`LocalSearch`](crate::local_search::LocalSearch)
//! driver; an improvement restarts the descent at the first neighborhood,
//! otherwise it moves on to the next. The run ends at a solution no
//! neighborhood improves, or when the time limit or a cancellation flag
//! stops it.
//!
//! # References
//!
//! - Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//!   *Computers & Operations Research* 24(11), 1097-1100.

mod config;
mod runner;

pub use config::{NeighborhoodConfig, VndConfig, DEFAULT_MAX_SHIFT_DURATION};
pub use runner::{optimize, Termination, VndResult, VndRunner};
