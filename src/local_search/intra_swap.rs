//! Intra-route swap: exchange two stops of one route.
//!
//! For positions `i < j` with stops `a = r[i]`, `b = r[j]`:
//!
//! ```text
//! non-adjacent: removed p_i→a, a→n_i, p_j→b, b→n_j   added p_i→b, b→n_i, p_j→a, a→n_j
//! adjacent:     removed p_i→a, a→b, b→n_j            added p_i→b, b→a, a→n_j
//! ```
//!
//! Service time stays on the route, so only travel changes.

use super::neighborhood::{Neighborhood, SearchContext};
use crate::compatibility::RouteCompatibility;
use crate::models::{Move, MoveKind, Solution};

/// Exchanges the stops at two positions of the same route.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntraSwap;

impl Neighborhood for IntraSwap {
    fn kind(&self) -> MoveKind {
        MoveKind::IntraSwap
    }

    fn generate<'a>(
        &'a self,
        solution: &'a Solution,
        _compatible: &'a dyn RouteCompatibility,
    ) -> Box<dyn Iterator<Item = Move> + 'a> {
        Box::new(solution.route_ids().flat_map(move |route| {
            let n = solution.route(route).len();
            (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| Move::IntraSwap { route, i, j }))
        }))
    }

    fn evaluate(&self, mv: &Move, ctx: &SearchContext<'_>) -> Option<f64> {
        let Move::IntraSwap { route, i, j } = *mv else {
            return None;
        };
        let r = ctx.route(route);
        let depot = ctx.depot();
        let stops = r.stops();
        let (a, b) = (stops[i], stops[j]);
        let prev_i = r.predecessor(i, depot);
        let next_j = r.successor(j, depot);

        let (old, new) = if j == i + 1 {
            (
                ctx.time(prev_i, a) + ctx.time(a, b) + ctx.time(b, next_j),
                ctx.time(prev_i, b) + ctx.time(b, a) + ctx.time(a, next_j),
            )
        } else {
            let next_i = r.successor(i, depot);
            let prev_j = r.predecessor(j, depot);
            (
                ctx.time(prev_i, a) + ctx.time(a, next_i) + ctx.time(prev_j, b) + ctx.time(b, next_j),
                ctx.time(prev_i, b) + ctx.time(b, next_i) + ctx.time(prev_j, a) + ctx.time(a, next_j),
            )
        };

        let delta = old - new;
        ctx.fits(ctx.duration(route) - delta).then_some(delta)
    }

    fn apply(&self, mv: &Move, solution: &mut Solution) {
        if let Move::IntraSwap { route, i, j } = *mv {
            solution.route_mut(route).stops_mut().swap(i, j);
        }
    }
}
