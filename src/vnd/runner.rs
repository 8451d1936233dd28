//! Variable Neighborhood Descent execution engine.
//!
//! # Algorithm
//!
//! 1. Set k = 0
//! 2. While k < number of neighborhoods:
//!    a. Stop if the time limit has elapsed or the run was cancelled
//!    b. **Local search**: run the driver for neighborhood k
//!    c. **Move or not**: record the new objective; if it improved by more
//!    than epsilon, set k = 0; otherwise k = k + 1
//! 3. Return the solution, a local optimum for every neighborhood when the
//!    loop ran to completion
//!
//! # Reference
//!
//! Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
//! Principles and applications", *European Journal of Operational Research*
//! 130(3), 449-467.

use super::config::VndConfig;
use crate::acceptance::Acceptance;
use crate::compatibility::RouteCompatibility;
use crate::distance::TravelTimeMatrix;
use crate::error::ConfigError;
use crate::evaluation::DurationEvaluator;
use crate::local_search::{neighborhood_for, LocalSearch};
use crate::models::{MoveKind, Solution};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Why a descent run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No neighborhood improves the solution.
    LocalOptimum,
    /// The wall-clock budget ran out.
    TimeLimit,
    /// The cancellation flag was raised.
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::LocalOptimum => f.write_str("local optimum"),
            Termination::TimeLimit => f.write_str("time limit"),
            Termination::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Result of a descent run.
#[derive(Debug, Clone)]
pub struct VndResult {
    /// Improved solution; same stops as the input.
    pub solution: Solution,
    /// Objective of the input solution.
    pub initial_objective: f64,
    /// Objective of the returned solution.
    pub objective: f64,
    /// Moves applied across all passes.
    pub applied_moves: usize,
    /// Local-search passes executed.
    pub neighborhood_passes: usize,
    /// Improving passes per neighborhood.
    pub improvements: BTreeMap<MoveKind, usize>,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// Stop reason.
    pub termination: Termination,
}

impl VndResult {
    /// Objective reduction achieved, in minutes.
    pub fn improvement(&self) -> f64 {
        self.initial_objective - self.objective
    }
}

/// Variable Neighborhood Descent runner.
pub struct VndRunner;

impl VndRunner {
    /// Runs the descent with the configured compatibility rule and
    /// acceptance strategy.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_vnd::distance::TravelTimeMatrix;
    /// use route_vnd::models::{Shift, Solution, Stop};
    /// use route_vnd::vnd::{Termination, VndConfig, VndRunner};
    ///
    /// // Two day routes serving the same corridor; merging them is cheaper.
    /// let pos = [0.0f64, 10.0, 20.0, 11.0, 21.0];
    /// let rows: Vec<Vec<f64>> = pos
    ///     .iter()
    ///     .map(|a| pos.iter().map(|b| (a - b).abs()).collect())
    ///     .collect();
    /// let tt = TravelTimeMatrix::from_rows(&rows).unwrap();
    /// let stops: Vec<Stop> = (1..=4).map(|id| Stop::new(id, 5.0, Shift::Day)).collect();
    /// let sol = Solution::from_routes(0, &tt, &stops, &[("a", vec![2, 1]), ("b", vec![4, 3])]).unwrap();
    ///
    /// let result = VndRunner::run(sol, &tt, &VndConfig::default()).unwrap();
    /// assert_eq!(result.termination, Termination::LocalOptimum);
    /// assert!(result.objective < result.initial_objective);
    /// assert_eq!(result.solution.num_stops(), 4);
    /// ```
    pub fn run(
        solution: Solution,
        travel_times: &TravelTimeMatrix,
        config: &VndConfig,
    ) -> Result<VndResult, ConfigError> {
        Self::run_with_cancel(solution, travel_times, config, None)
    }

    /// Runs the descent with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set, the run stops before the
    /// next neighborhood pass and returns the best solution so far.
    pub fn run_with_cancel(
        solution: Solution,
        travel_times: &TravelTimeMatrix,
        config: &VndConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<VndResult, ConfigError> {
        config.validate()?;
        let mut acceptance = config.acceptance.build()?;
        Self::run_with(
            solution,
            travel_times,
            config,
            &config.compatibility,
            acceptance.as_mut(),
            cancel,
        )
    }

    /// Runs the descent with a caller-supplied compatibility predicate and
    /// acceptance strategy; `config.compatibility` and `config.acceptance`
    /// are ignored.
    pub fn run_with(
        mut solution: Solution,
        travel_times: &TravelTimeMatrix,
        config: &VndConfig,
        compatible: &dyn RouteCompatibility,
        acceptance: &mut dyn Acceptance,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<VndResult, ConfigError> {
        config.validate()?;
        check_matrix(&solution, travel_times)?;

        let start = Instant::now();
        let evaluator = DurationEvaluator::new(travel_times, config.max_shift_duration);
        let initial_objective = evaluator.objective(&solution);
        info!(
            routes = solution.num_routes(),
            stops = solution.num_stops(),
            objective = initial_objective,
            "starting variable neighborhood descent"
        );

        let neighborhoods: Vec<_> = config
            .neighborhoods
            .iter()
            .map(|nb| (neighborhood_for(nb.kind), config.local_search(nb)))
            .collect();

        let mut objective = initial_objective;
        let mut applied_moves = 0;
        let mut neighborhood_passes = 0;
        let mut improvements = BTreeMap::new();
        let mut termination = Termination::LocalOptimum;
        let mut k = 0;

        while k < neighborhoods.len() {
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                termination = Termination::Cancelled;
                warn!(objective, passes = neighborhood_passes, "descent cancelled");
                break;
            }
            if config.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                termination = Termination::TimeLimit;
                warn!(objective, passes = neighborhood_passes, "descent time limit reached");
                break;
            }

            let (neighborhood, ls_config) = &neighborhoods[k];
            let outcome = LocalSearch::run(
                &mut solution,
                neighborhood.as_ref(),
                &evaluator,
                compatible,
                acceptance,
                ls_config,
            );
            neighborhood_passes += 1;
            applied_moves += outcome.applied_moves;

            let new_objective = evaluator.objective(&solution);
            let improved = new_objective < objective - config.epsilon;
            if improved {
                let kind = neighborhood.kind();
                debug!(
                    neighborhood = %kind,
                    improvement = objective - new_objective,
                    objective = new_objective,
                    "neighborhood improved"
                );
                *improvements.entry(kind).or_insert(0) += 1;
            }
            // Moves inside the epsilon band still changed the solution.
            objective = new_objective;
            k = if improved { 0 } else { k + 1 };
        }

        let elapsed = start.elapsed();
        info!(
            objective,
            applied_moves,
            elapsed_ms = elapsed.as_millis() as u64,
            termination = %termination,
            "variable neighborhood descent finished"
        );

        Ok(VndResult {
            solution,
            initial_objective,
            objective,
            applied_moves,
            neighborhood_passes,
            improvements,
            elapsed,
            termination,
        })
    }
}

/// Runs the descent and returns only the improved solution.
///
/// # Examples
///
/// ```
/// use route_vnd::distance::TravelTimeMatrix;
/// use route_vnd::models::{Shift, Solution, Stop};
/// use route_vnd::vnd::{optimize, VndConfig};
///
/// let tt = TravelTimeMatrix::from_rows(&[
///     vec![0.0, 4.0, 6.0],
///     vec![4.0, 0.0, 3.0],
///     vec![6.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// let stops = [Stop::new(1, 2.0, Shift::Night), Stop::new(2, 2.0, Shift::Night)];
/// let sol = Solution::from_routes(0, &tt, &stops, &[("n1", vec![1, 2])]).unwrap();
/// let best = optimize(sol, &tt, &VndConfig::default()).unwrap();
/// assert_eq!(best.num_stops(), 2);
/// ```
pub fn optimize(
    solution: Solution,
    travel_times: &TravelTimeMatrix,
    config: &VndConfig,
) -> Result<Solution, ConfigError> {
    VndRunner::run(solution, travel_times, config).map(|result| result.solution)
}

fn check_matrix(solution: &Solution, travel_times: &TravelTimeMatrix) -> Result<(), ConfigError> {
    let size = travel_times.size();
    let depot = solution.depot();
    if !travel_times.contains(depot) {
        return Err(ConfigError::DepotOutOfRange { depot, size });
    }
    match solution.stop_ids().into_iter().find(|&s| !travel_times.contains(s)) {
        Some(stop) => Err(ConfigError::StopOutOfRange { stop, size }),
        None => Ok(()),
    }
}
