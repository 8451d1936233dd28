//! Inter-route shift (relocate).
//!
//! # Algorithm
//!
//! `InterShift { from, to, i, j }` removes the stop at position `i` of
//! `from` and inserts it at index `j` of `to` (`j` in `0..=len(to)`). The
//! stop's service time moves with it:
//!
//! ```text
//! new(from) = dur(from) - removal_gain(i) - s(stop)
//! new(to)   = dur(to) + insertion_cost(j) + s(stop)
//! ```
//!
//! Removing the last stop of `from` leaves an empty route, which is dropped
//! from the solution with duration zero.
//!
//! # Complexity
//!
//! O(n₁ × n₂) moves per ordered route pair, each evaluated in O(1).
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::neighborhood::{insertion_cost, route_pairs, Neighborhood, SearchContext};
use crate::compatibility::RouteCompatibility;
use crate::models::{Move, MoveKind, Solution};

/// Moves one stop into another compatible route.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterShift;

impl Neighborhood for InterShift {
    fn kind(&self) -> MoveKind {
        MoveKind::InterShift
    }

    fn generate<'a>(
        &'a self,
        solution: &'a Solution,
        compatible: &'a dyn RouteCompatibility,
    ) -> Box<dyn Iterator<Item = Move> + 'a> {
        Box::new(
            route_pairs(solution, compatible, true).flat_map(move |(from, to)| {
                let n1 = solution.route(from).len();
                let n2 = solution.route(to).len();
                (0..n1).flat_map(move |i| (0..=n2).map(move |j| Move::InterShift { from, to, i, j }))
            }),
        )
    }

    fn evaluate(&self, mv: &Move, ctx: &SearchContext<'_>) -> Option<f64> {
        let Move::InterShift { from, to, i, j } = *mv else {
            return None;
        };
        let source = ctx.route(from);
        let target = ctx.route(to);
        let depot = ctx.depot();
        let stop = source.stops()[i];
        let service = ctx.service(stop);

        let new_from = if source.len() == 1 {
            0.0
        } else {
            ctx.duration(from) - ctx.removal_gain(source, i) - service
        };

        let prev = if j == 0 {
            depot
        } else {
            target.stops()[j - 1]
        };
        let next = target.stops().get(j).copied().unwrap_or(depot);
        let new_to = ctx.duration(to) + insertion_cost(ctx, prev, stop, next) + service;

        if !(ctx.fits(new_from) && ctx.fits(new_to)) {
            return None;
        }
        Some(ctx.duration(from) + ctx.duration(to) - new_from - new_to)
    }

    fn apply(&self, mv: &Move, solution: &mut Solution) {
        if let Move::InterShift { from, to, i, j } = *mv {
            let (source, target) = solution.route_pair_mut(from, to);
            let stop = source.stops_mut().remove(i);
            target.stops_mut().insert(j, stop);
            solution.prune_empty_routes();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::CompatibilityRule;
    use crate::distance::TravelTimeMatrix;
    use crate::error::ConfigError;
    use crate::evaluation::DurationEvaluator;
    use crate::local_search::testing;
    use crate::models::{RouteId, Shift, Stop};
    use proptest::prelude::*;

    fn setup() -> (TravelTimeMatrix, Vec<Stop>) {
        // Depot 0; stops 1, 2 at distance 10; stop 3 far away at 50.
        let pos = [0.0f64, 10.0, 10.0, 50.0];
        let rows: Vec<Vec<f64>> = pos
            .iter()
            .map(|a| pos.iter().map(|b| (a - b).abs()).collect())
            .collect();
        let tt = TravelTimeMatrix::from_rows(&rows).expect("valid");
        let stops = vec![
            Stop::new(1, 5.0, Shift::Day),
            Stop::new(2, 5.0, Shift::Day),
            Stop::new(3, 5.0, Shift::Night),
        ];
        (tt, stops)
    }

    #[test]
    fn test_merge_single_stop_route() {
        let (tt, stops) = setup();
        let mut sol = Solution::from_routes(0, &tt, &stops[..2], &[("a", vec![1]), ("b", vec![2])])
            .expect("valid");
        let eval = DurationEvaluator::new(&tt, 480.0);
        let durations = eval.route_durations(&sol);
        let ctx = SearchContext {
            solution: &sol,
            durations: &durations,
            travel_times: &tt,
            max_shift_duration: 480.0,
        };
        // a = b = 20 + 5; merged route 0→2→1→0 = 20 + 10 = 30
        let mv = Move::InterShift {
            from: RouteId(0),
            to: RouteId(1),
            i: 0,
            j: 1,
        };
        let delta = InterShift.evaluate(&mv, &ctx).expect("feasible");
        assert!((delta - 20.0).abs() < 1e-10);

        InterShift.apply(&mv, &mut sol);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.routes()[0].name(), "b");
        assert_eq!(sol.routes()[0].stops(), &[2, 1]);
        assert!((eval.objective(&sol) - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_receiving_route_cap() {
        let (tt, stops) = setup();
        let sol = Solution::from_routes(0, &tt, &stops[..2], &[("a", vec![1]), ("b", vec![2])])
            .expect("valid");
        let durations = [25.0, 25.0];
        let ctx = SearchContext {
            solution: &sol,
            durations: &durations,
            travel_times: &tt,
            max_shift_duration: 29.0,
        };
        let mv = Move::InterShift {
            from: RouteId(0),
            to: RouteId(1),
            i: 0,
            j: 0,
        };
        assert_eq!(InterShift.evaluate(&mv, &ctx), None);
    }

    #[test]
    fn test_fixture_needs_every_stop_routed() {
        let (tt, stops) = setup();
        let partial = Solution::from_routes(0, &tt, &stops, &[("a", vec![1]), ("b", vec![2])]);
        assert!(matches!(partial, Err(ConfigError::UnassignedStop { stop: 3 })));
    }

    #[test]
    fn test_generate_respects_compatibility() {
        let (tt, stops) = setup();
        let sol = Solution::from_routes(0, &tt, &stops, &[("a", vec![1, 2]), ("n", vec![3])])
            .expect("valid");
        let same = CompatibilityRule::SameShift;
        assert_eq!(InterShift.generate(&sol, &same).count(), 0);
        // a→n: 2 stops × 2 slots, n→a: 1 stop × 3 slots
        assert_eq!(InterShift.generate(&sol, &CompatibilityRule::Any).count(), 7);
    }

    proptest! {
        #[test]
        fn prop_inter_shift_delta_exact(inst in testing::instance()) {
            testing::check_moves(&InterShift, &inst)?;
        }
    }
}
