//! Single-neighborhood hill climbing.
//!
//! # Algorithm
//!
//! Each outer iteration rebuilds the route-duration snapshot, enumerates
//! the neighborhood and evaluates every move against the snapshot. A move
//! is a candidate when it is feasible, improves by more than `epsilon` (and
//! by more than the best candidate so far under best-improvement), and the
//! acceptance strategy agrees. The selected move is applied and the scan
//! restarts from a fresh snapshot; moves are never composed. The search
//! stops when no candidate exists or the iteration cap is reached.

use super::neighborhood::{Neighborhood, SearchContext};
use crate::acceptance::Acceptance;
use crate::compatibility::RouteCompatibility;
use crate::error::ConfigError;
use crate::evaluation::DurationEvaluator;
use crate::models::{Move, Solution};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How a scan picks among candidate moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImprovementPolicy {
    /// Apply the first candidate found.
    First,
    /// Scan every move and apply the largest improvement.
    #[default]
    Best,
}

impl fmt::Display for ImprovementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImprovementPolicy::First => f.write_str("First"),
            ImprovementPolicy::Best => f.write_str("Best"),
        }
    }
}

impl FromStr for ImprovementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(ImprovementPolicy::First),
            "best" => Ok(ImprovementPolicy::Best),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Configuration of one local-search run.
///
/// # Examples
///
/// ```
/// use route_vnd::local_search::{ImprovementPolicy, LocalSearchConfig};
///
/// let config = LocalSearchConfig::default()
///     .with_max_iterations(10)
///     .with_policy(ImprovementPolicy::First);
/// assert_eq!(config.max_iterations, Some(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalSearchConfig {
    /// Maximum number of scans; `None` runs to a local optimum.
    pub max_iterations: Option<usize>,
    /// Candidate selection policy.
    pub policy: ImprovementPolicy,
    /// Minimum improvement (minutes) for a move to count.
    pub epsilon: f64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: None,
            policy: ImprovementPolicy::Best,
            epsilon: 1e-6,
        }
    }
}

impl LocalSearchConfig {
    /// Caps the number of scans.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the improvement policy.
    pub fn with_policy(mut self, policy: ImprovementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the improvement threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Validates parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_epsilon(self.epsilon)
    }
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<(), ConfigError> {
    if epsilon >= 0.0 && epsilon.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name: "epsilon",
            reason: format!("must be non-negative and finite, got {epsilon}"),
        })
    }
}

/// Statistics of a local-search run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalSearchResult {
    /// Scans performed, including the final unsuccessful one.
    pub iterations: usize,
    /// Moves applied.
    pub applied_moves: usize,
}

/// Hill-climbing driver over one neighborhood.
pub struct LocalSearch;

impl LocalSearch {
    /// Improves `solution` in place with moves from `neighborhood`.
    ///
    /// Stop membership is preserved; empty routes left by inter-route
    /// moves are removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_vnd::acceptance::Greedy;
    /// use route_vnd::compatibility::CompatibilityRule;
    /// use route_vnd::distance::TravelTimeMatrix;
    /// use route_vnd::evaluation::DurationEvaluator;
    /// use route_vnd::local_search::{Intra2Opt, LocalSearch, LocalSearchConfig};
    /// use route_vnd::models::{Shift, Solution, Stop};
    ///
    /// let pos = [0.0f64, 1.0, 2.0, 3.0, 4.0];
    /// let rows: Vec<Vec<f64>> = pos
    ///     .iter()
    ///     .map(|a| pos.iter().map(|b| (a - b).abs()).collect())
    ///     .collect();
    /// let tt = TravelTimeMatrix::from_rows(&rows).unwrap();
    /// let stops: Vec<Stop> = (1..=4).map(|id| Stop::new(id, 0.0, Shift::Day)).collect();
    /// let mut sol = Solution::from_routes(0, &tt, &stops, &[("R", vec![3, 1, 4, 2])]).unwrap();
    ///
    /// let evaluator = DurationEvaluator::new(&tt, 480.0);
    /// let result = LocalSearch::run(
    ///     &mut sol,
    ///     &Intra2Opt,
    ///     &evaluator,
    ///     &CompatibilityRule::SameShift,
    ///     &mut Greedy,
    ///     &LocalSearchConfig::default(),
    /// );
    /// assert!(result.applied_moves > 0);
    /// assert!((evaluator.objective(&sol) - 8.0).abs() < 1e-10);
    /// ```
    pub fn run(
        solution: &mut Solution,
        neighborhood: &dyn Neighborhood,
        evaluator: &DurationEvaluator<'_>,
        compatible: &dyn RouteCompatibility,
        acceptance: &mut dyn Acceptance,
        config: &LocalSearchConfig,
    ) -> LocalSearchResult {
        let mut iterations = 0;
        let mut applied_moves = 0;

        while config.max_iterations.is_none_or(|cap| iterations < cap) {
            let durations = evaluator.route_durations(solution);
            let current: f64 = durations.iter().sum();
            let ctx = SearchContext {
                solution: &*solution,
                durations: &durations,
                travel_times: evaluator.travel_times(),
                max_shift_duration: evaluator.max_shift_duration(),
            };
            let selected = select(neighborhood, &ctx, compatible, acceptance, current, config);
            iterations += 1;

            let Some((mv, delta)) = selected else {
                break;
            };
            trace!(neighborhood = %neighborhood.kind(), %mv, delta, "applying move");
            neighborhood.apply(&mv, solution);
            applied_moves += 1;
        }

        LocalSearchResult {
            iterations,
            applied_moves,
        }
    }
}

/// Picks the move to apply from one scan, if any.
fn select(
    neighborhood: &dyn Neighborhood,
    ctx: &SearchContext<'_>,
    compatible: &dyn RouteCompatibility,
    acceptance: &mut dyn Acceptance,
    current: f64,
    config: &LocalSearchConfig,
) -> Option<(Move, f64)> {
    #[cfg(feature = "parallel")]
    if config.policy == ImprovementPolicy::Best {
        return select_parallel(neighborhood, ctx, compatible, acceptance, current, config);
    }
    select_sequential(neighborhood, ctx, compatible, acceptance, current, config)
}

fn select_sequential(
    neighborhood: &dyn Neighborhood,
    ctx: &SearchContext<'_>,
    compatible: &dyn RouteCompatibility,
    acceptance: &mut dyn Acceptance,
    current: f64,
    config: &LocalSearchConfig,
) -> Option<(Move, f64)> {
    let candidates = neighborhood
        .generate(ctx.solution, compatible)
        .map(|mv| (mv, neighborhood.evaluate(&mv, ctx)));
    choose(candidates, acceptance, current, config)
}

/// Evaluates every move on the rayon pool, then chooses sequentially in
/// enumeration order so the acceptance strategy sees the same sequence as
/// the sequential scan.
#[cfg(feature = "parallel")]
fn select_parallel(
    neighborhood: &dyn Neighborhood,
    ctx: &SearchContext<'_>,
    compatible: &dyn RouteCompatibility,
    acceptance: &mut dyn Acceptance,
    current: f64,
    config: &LocalSearchConfig,
) -> Option<(Move, f64)> {
    let moves: Vec<Move> = neighborhood.generate(ctx.solution, compatible).collect();
    let deltas: Vec<Option<f64>> = moves
        .par_iter()
        .map(|mv| neighborhood.evaluate(mv, ctx))
        .collect();
    choose(moves.into_iter().zip(deltas), acceptance, current, config)
}

fn choose(
    candidates: impl Iterator<Item = (Move, Option<f64>)>,
    acceptance: &mut dyn Acceptance,
    current: f64,
    config: &LocalSearchConfig,
) -> Option<(Move, f64)> {
    let mut best: Option<(Move, f64)> = None;
    for (mv, delta) in candidates {
        let Some(delta) = delta else {
            continue;
        };
        let threshold = best.map_or(config.epsilon, |(_, d)| d);
        if delta <= threshold || !acceptance.accept(delta, current, current - delta) {
            continue;
        }
        if config.policy == ImprovementPolicy::First {
            return Some((mv, delta));
        }
        best = Some((mv, delta));
    }
    best
}
