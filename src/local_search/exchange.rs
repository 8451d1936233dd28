//! Inter-route tail exchange (2-opt*).
//!
//! # Algorithm
//!
//! Given routes R1 = [a₁, ..., aᵢ, aᵢ₊₁, ..., aₙ] and
//! R2 = [b₁, ..., bⱼ, bⱼ₊₁, ..., bₘ], `Inter2OptStar { i, j }` produces:
//!
//! R1' = [a₁, ..., aᵢ, bⱼ₊₁, ..., bₘ]
//! R2' = [b₁, ..., bⱼ, aᵢ₊₁, ..., aₙ]
//!
//! Both heads and both tails are non-empty, so no route is emptied. Each
//! route's new duration is computed exactly: the removed boundary arc, the
//! outgoing tail's internal arcs and return leg, and its service time are
//! replaced by those of the incoming tail.
//!
//! # Complexity
//!
//! O(n × m) moves per route pair, each evaluated in O(n + m).
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use super::neighborhood::{route_pairs, Neighborhood, SearchContext};
use crate::compatibility::RouteCompatibility;
use crate::models::{Move, MoveKind, Route, Solution};

/// Swaps the tails of two compatible routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inter2OptStar;

/// Travel plus service time of the tail of `route` after position `pos`,
/// including its return leg to the depot.
fn tail_time(ctx: &SearchContext<'_>, route: &Route, pos: usize) -> f64 {
    let stops = route.stops();
    let last = stops.len() - 1;
    ctx.path_time(stops, pos + 1, last)
        + ctx.time(stops[last], ctx.depot())
        + ctx.solution.service_time_of(&stops[pos + 1..])
}

impl Neighborhood for Inter2OptStar {
    fn kind(&self) -> MoveKind {
        MoveKind::Inter2OptStar
    }

    fn generate<'a>(
        &'a self,
        solution: &'a Solution,
        compatible: &'a dyn RouteCompatibility,
    ) -> Box<dyn Iterator<Item = Move> + 'a> {
        Box::new(
            route_pairs(solution, compatible, false).flat_map(move |(r1, r2)| {
                let n1 = solution.route(r1).len();
                let n2 = solution.route(r2).len();
                (0..n1.saturating_sub(1)).flat_map(move |i| {
                    (0..n2.saturating_sub(1)).map(move |j| Move::Inter2OptStar { r1, r2, i, j })
                })
            }),
        )
    }

    fn evaluate(&self, mv: &Move, ctx: &SearchContext<'_>) -> Option<f64> {
        let Move::Inter2OptStar { r1, r2, i, j } = *mv else {
            return None;
        };
        let route1 = ctx.route(r1);
        let route2 = ctx.route(r2);
        let (a, b) = (route1.stops()[i], route1.stops()[i + 1]);
        let (c, d) = (route2.stops()[j], route2.stops()[j + 1]);
        let tail1 = tail_time(ctx, route1, i);
        let tail2 = tail_time(ctx, route2, j);

        let new1 = ctx.duration(r1) - ctx.time(a, b) - tail1 + ctx.time(a, d) + tail2;
        let new2 = ctx.duration(r2) - ctx.time(c, d) - tail2 + ctx.time(c, b) + tail1;
        if !(ctx.fits(new1) && ctx.fits(new2)) {
            return None;
        }
        Some(ctx.duration(r1) + ctx.duration(r2) - new1 - new2)
    }

    fn apply(&self, mv: &Move, solution: &mut Solution) {
        if let Move::Inter2OptStar { r1, r2, i, j } = *mv {
            let (route1, route2) = solution.route_pair_mut(r1, r2);
            let tail1 = route1.stops_mut().split_off(i + 1);
            let tail2 = route2.stops_mut().split_off(j + 1);
            route1.stops_mut().extend(tail2);
            route2.stops_mut().extend(tail1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::CompatibilityRule;
    use crate::distance::TravelTimeMatrix;
    use crate::evaluation::DurationEvaluator;
    use crate::local_search::testing;
    use crate::models::{RouteId, Shift, Stop};
    use proptest::prelude::*;

    /// Depot at the origin, stops 1-2 east and 3-4 west; routes cross over.
    fn crossed() -> (TravelTimeMatrix, Solution) {
        let pos = [0.0f64, 10.0, 20.0, -10.0, -20.0];
        let rows: Vec<Vec<f64>> = pos
            .iter()
            .map(|a| pos.iter().map(|b| (a - b).abs()).collect())
            .collect();
        let tt = TravelTimeMatrix::from_rows(&rows).expect("valid");
        let stops: Vec<Stop> = (1..=4).map(|id| Stop::new(id, 2.0, Shift::Day)).collect();
        let sol = Solution::from_routes(0, &tt, &stops, &[("a", vec![1, 4]), ("b", vec![3, 2])])
            .expect("valid");
        (tt, sol)
    }

    #[test]
    fn test_uncross_tails() {
        let (tt, mut sol) = crossed();
        let eval = DurationEvaluator::new(&tt, 480.0);
        let durations = eval.route_durations(&sol);
        // a: 0→1→4→0 = 10 + 30 + 20 = 60 + 4; b: 0→3→2→0 = 10 + 30 + 20 = 60 + 4
        assert!((eval.objective(&sol) - 128.0).abs() < 1e-10);
        let ctx = SearchContext {
            solution: &sol,
            durations: &durations,
            travel_times: &tt,
            max_shift_duration: 480.0,
        };
        let mv = Move::Inter2OptStar {
            r1: RouteId(0),
            r2: RouteId(1),
            i: 0,
            j: 0,
        };
        // a': 0→1→2→0 = 40 + 4; b': 0→3→4→0 = 40 + 4
        let delta = Inter2OptStar.evaluate(&mv, &ctx).expect("feasible");
        assert!((delta - 40.0).abs() < 1e-10);

        Inter2OptStar.apply(&mv, &mut sol);
        assert_eq!(sol.routes()[0].stops(), &[1, 2]);
        assert_eq!(sol.routes()[1].stops(), &[3, 4]);
        assert!((eval.objective(&sol) - 88.0).abs() < 1e-10);
    }

    #[test]
    fn test_cap_applies_to_both_routes() {
        let (tt, sol) = crossed();
        let durations = [64.0, 64.0];
        let ctx = SearchContext {
            solution: &sol,
            durations: &durations,
            travel_times: &tt,
            max_shift_duration: 43.0,
        };
        let mv = Move::Inter2OptStar {
            r1: RouteId(0),
            r2: RouteId(1),
            i: 0,
            j: 0,
        };
        assert_eq!(Inter2OptStar.evaluate(&mv, &ctx), None);
    }

    #[test]
    fn test_generate_keeps_tails_non_empty() {
        let tt = TravelTimeMatrix::new(5);
        let stops: Vec<Stop> = (1..=4).map(|id| Stop::new(id, 0.0, Shift::Day)).collect();
        let sol = Solution::from_routes(0, &tt, &stops, &[("a", vec![1, 2, 3]), ("b", vec![4])])
            .expect("valid");
        // Single-stop route has no tail to give.
        assert_eq!(Inter2OptStar.generate(&sol, &CompatibilityRule::Any).count(), 0);
    }

    proptest! {
        #[test]
        fn prop_two_opt_star_delta_exact(inst in testing::instance()) {
            testing::check_moves(&Inter2OptStar, &inst)?;
        }
    }
}
