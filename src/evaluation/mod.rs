//! Route duration evaluation and reporting.
//!
//! - [`DurationEvaluator`] — from-scratch route durations, objective, violations
//! - [`SolutionReport`] — per-route and per-shift reporting view

mod evaluator;
mod metrics;

pub use evaluator::DurationEvaluator;
pub use metrics::{RouteMetrics, ShiftStats, SolutionReport};
