//! Intra-route shift: move one stop to another position of its route.
//!
//! `IntraShift { i, j }` removes the stop at position `i` and reinserts it at
//! index `j` of the route *with `i` removed*, so `j` ranges over `0..n` and
//! `j == i` is the identity move (never generated).

use super::neighborhood::{insertion_cost, Neighborhood, SearchContext};
use crate::compatibility::RouteCompatibility;
use crate::models::{Move, MoveKind, Solution};

/// Relocates a stop within its own route.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntraShift;

impl Neighborhood for IntraShift {
    fn kind(&self) -> MoveKind {
        MoveKind::IntraShift
    }

    fn generate<'a>(
        &'a self,
        solution: &'a Solution,
        _compatible: &'a dyn RouteCompatibility,
    ) -> Box<dyn Iterator<Item = Move> + 'a> {
        Box::new(solution.route_ids().flat_map(move |route| {
            let n = solution.route(route).len();
            (0..n).flat_map(move |i| {
                (0..n)
                    .filter(move |&j| j != i)
                    .map(move |j| Move::IntraShift { route, i, j })
            })
        }))
    }

    fn evaluate(&self, mv: &Move, ctx: &SearchContext<'_>) -> Option<f64> {
        let Move::IntraShift { route, i, j } = *mv else {
            return None;
        };
        let r = ctx.route(route);
        let stops = r.stops();
        let depot = ctx.depot();
        let stop = stops[i];

        // Index into the route with position i removed.
        let remaining = |k: usize| if k < i { stops[k] } else { stops[k + 1] };
        let prev = if j == 0 { depot } else { remaining(j - 1) };
        let next = if j + 1 == stops.len() {
            depot
        } else {
            remaining(j)
        };

        let delta = ctx.removal_gain(r, i) - insertion_cost(ctx, prev, stop, next);
        ctx.fits(ctx.duration(route) - delta).then_some(delta)
    }

    fn apply(&self, mv: &Move, solution: &mut Solution) {
        if let Move::IntraShift { route, i, j } = *mv {
            let stops = solution.route_mut(route).stops_mut();
            let stop = stops.remove(i);
            stops.insert(j, stop);
        }
    }
}
