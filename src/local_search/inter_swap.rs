//! Inter-route swap: exchange one stop of each of two routes.

use super::neighborhood::{route_pairs, Neighborhood, SearchContext};
use crate::compatibility::RouteCompatibility;
use crate::models::{Move, MoveKind, Route, Solution};

/// Exchanges stops between two compatible routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterSwap;

/// Duration of `route` after the stop at `pos` is replaced by `incoming`.
fn replaced_duration(
    ctx: &SearchContext<'_>,
    route: &Route,
    duration: f64,
    pos: usize,
    incoming: usize,
) -> f64 {
    let depot = ctx.depot();
    let outgoing = route.stops()[pos];
    let prev = route.predecessor(pos, depot);
    let next = route.successor(pos, depot);
    duration - ctx.time(prev, outgoing) - ctx.time(outgoing, next) - ctx.service(outgoing)
        + ctx.time(prev, incoming)
        + ctx.time(incoming, next)
        + ctx.service(incoming)
}

impl Neighborhood for InterSwap {
    fn kind(&self) -> MoveKind {
        MoveKind::InterSwap
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
                (0..n1).flat_map(move |i| (0..n2).map(move |j| Move::InterSwap { r1, r2, i, j }))
            }),
        )
    }

    fn evaluate(&self, mv: &Move, ctx: &SearchContext<'_>) -> Option<f64> {
        let Move::InterSwap { r1, r2, i, j } = *mv else {
            return None;
        };
        let route1 = ctx.route(r1);
        let route2 = ctx.route(r2);
        let (a, b) = (route1.stops()[i], route2.stops()[j]);

        let new1 = replaced_duration(ctx, route1, ctx.duration(r1), i, b);
        let new2 = replaced_duration(ctx, route2, ctx.duration(r2), j, a);
        if !(ctx.fits(new1) && ctx.fits(new2)) {
            return None;
        }
        Some(ctx.duration(r1) + ctx.duration(r2) - new1 - new2)
    }

    fn apply(&self, mv: &Move, solution: &mut Solution) {
        if let Move::InterSwap { r1, r2, i, j } = *mv {
            let (route1, route2) = solution.route_pair_mut(r1, r2);
            std::mem::swap(&mut route1.stops_mut()[i], &mut route2.stops_mut()[j]);
        }
    }
}
