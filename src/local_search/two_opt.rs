//! Intra-route 2-opt.
//!
//! # Algorithm
//!
//! `Intra2Opt { i, j }` reverses the closed segment `r[i..=j]`. With
//! `a = pred(i)`, `b = r[i]`, `c = r[j]`, `d = succ(j)`:
//!
//! ```text
//! old = t(a, b) + Σ t(r[k], r[k+1]) + t(c, d)      k in i..j
//! new = t(a, c) + Σ t(r[k+1], r[k]) + t(b, d)      k in i..j
//! ```
//!
//! The internal arcs are summed in both directions, so the delta is exact
//! for asymmetric travel times.
//!
//! # Complexity
//!
//! O(n²) moves per route, each evaluated in O(j - i).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::neighborhood::{Neighborhood, SearchContext};
use crate::compatibility::RouteCompatibility;
use crate::models::{Move, MoveKind, Solution};

/// Reverses a segment of one route.
///
/// # Examples
///
/// ```
/// use route_vnd::distance::TravelTimeMatrix;
/// use route_vnd::evaluation::DurationEvaluator;
/// use route_vnd::local_search::{Intra2Opt, Neighborhood, SearchContext};
/// use route_vnd::models::{Move, RouteId, Shift, Solution, Stop};
///
/// // Crossing tour 0→1→3→2→4→0 over points on a line.
/// let pos = [0.0f64, 1.0, 2.0, 3.0, 4.0];
/// let rows: Vec<Vec<f64>> = pos
///     .iter()
///     .map(|a| pos.iter().map(|b| (a - b).abs()).collect())
///     .collect();
/// let tt = TravelTimeMatrix::from_rows(&rows).unwrap();
/// let stops: Vec<Stop> = (1..=4).map(|id| Stop::new(id, 0.0, Shift::Day)).collect();
/// let mut sol = Solution::from_routes(0, &tt, &stops, &[("R", vec![1, 3, 2, 4])]).unwrap();
///
/// let durations = DurationEvaluator::new(&tt, 480.0).route_durations(&sol);
/// let ctx = SearchContext {
///     solution: &sol,
///     durations: &durations,
///     travel_times: &tt,
///     max_shift_duration: 480.0,
/// };
/// let mv = Move::Intra2Opt { route: RouteId(0), i: 1, j: 2 };
/// assert_eq!(Intra2Opt.evaluate(&mv, &ctx), Some(2.0));
///
/// Intra2Opt.apply(&mv, &mut sol);
/// assert_eq!(sol.routes()[0].stops(), &[1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Intra2Opt;

impl Neighborhood for Intra2Opt {
    fn kind(&self) -> MoveKind {
        MoveKind::Intra2Opt
    }

    fn generate<'a>(
        &'a self,
        solution: &'a Solution,
        _compatible: &'a dyn RouteCompatibility,
    ) -> Box<dyn Iterator<Item = Move> + 'a> {
        Box::new(solution.route_ids().flat_map(move |route| {
            let n = solution.route(route).len();
            (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| Move::Intra2Opt { route, i, j }))
        }))
    }

    fn evaluate(&self, mv: &Move, ctx: &SearchContext<'_>) -> Option<f64> {
        let Move::Intra2Opt { route, i, j } = *mv else {
            return None;
        };
        let r = ctx.route(route);
        let stops = r.stops();
        let depot = ctx.depot();
        let (a, b) = (r.predecessor(i, depot), stops[i]);
        let (c, d) = (stops[j], r.successor(j, depot));

        let forward = ctx.path_time(stops, i, j);
        let reversed: f64 = (i..j).map(|k| ctx.time(stops[k + 1], stops[k])).sum();

        let old = ctx.time(a, b) + forward + ctx.time(c, d);
        let new = ctx.time(a, c) + reversed + ctx.time(b, d);
        let delta = old - new;
        ctx.fits(ctx.duration(route) - delta).then_some(delta)
    }

    fn apply(&self, mv: &Move, solution: &mut Solution) {
        if let Move::Intra2Opt { route, i, j } = *mv {
            solution.route_mut(route).stops_mut()[i..=j].reverse();
        }
    }
}
