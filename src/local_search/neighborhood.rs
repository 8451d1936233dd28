//! Neighborhood contract and shared delta helpers.

use crate::compatibility::RouteCompatibility;
use crate::distance::TravelTimeMatrix;
use crate::models::{Move, MoveKind, Route, RouteId, Solution};

/// Read-only snapshot a neighborhood evaluates moves against.
///
/// `durations[r]` holds the duration of route `r` of `solution`, computed
/// once per driver iteration so that evaluation never rebuilds a route.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    /// Solution the moves were generated from.
    pub solution: &'a Solution,
    /// Route durations, indexed by [`RouteId`].
    pub durations: &'a [f64],
    /// Travel times in minutes.
    pub travel_times: &'a TravelTimeMatrix,
    /// Shift cap in minutes.
    pub max_shift_duration: f64,
}

impl<'a> SearchContext<'a> {
    /// Depot id.
    #[inline]
    pub fn depot(&self) -> usize {
        self.solution.depot()
    }

    /// Travel time `from → to`.
    #[inline]
    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.travel_times.get(from, to)
    }

    /// Route behind a handle.
    #[inline]
    pub fn route(&self, id: RouteId) -> &'a Route {
        self.solution.route(id)
    }

    /// Cached duration of a route.
    #[inline]
    pub fn duration(&self, id: RouteId) -> f64 {
        self.durations[id.index()]
    }

    /// Service time of a stop.
    #[inline]
    pub fn service(&self, stop: usize) -> f64 {
        self.solution.service_time(stop)
    }

    /// Returns `true` if a route of the given duration respects the cap.
    #[inline]
    pub fn fits(&self, duration: f64) -> bool {
        duration <= self.max_shift_duration
    }

    /// Sum of the forward arcs `stops[k] → stops[k+1]` for `k` in `from..to`.
    pub(crate) fn path_time(&self, stops: &[usize], from: usize, to: usize) -> f64 {
        (from..to).map(|k| self.time(stops[k], stops[k + 1])).sum()
    }

    /// Travel time saved by removing the stop at `pos` and bridging its
    /// neighbors: `t(prev, s) + t(s, next) - t(prev, next)`.
    ///
    /// Removing the only stop of a route saves the whole round trip.
    pub(crate) fn removal_gain(&self, route: &Route, pos: usize) -> f64 {
        let depot = self.depot();
        let stop = route.stops()[pos];
        let prev = route.predecessor(pos, depot);
        let next = route.successor(pos, depot);
        let bridge = if route.len() == 1 {
            0.0
        } else {
            self.time(prev, next)
        };
        self.time(prev, stop) + self.time(stop, next) - bridge
    }
}

/// Travel time added by inserting `stop` between `prev` and `next`:
/// `t(prev, stop) + t(stop, next) - t(prev, next)`.
#[inline]
pub(crate) fn insertion_cost(ctx: &SearchContext<'_>, prev: usize, stop: usize, next: usize) -> f64 {
    ctx.time(prev, stop) + ctx.time(stop, next) - ctx.time(prev, next)
}

/// One family of moves: generation, incremental evaluation, application.
///
/// `evaluate` never mutates; `apply` assumes the move was generated from,
/// and evaluated against, the solution it is applied to. Moves of another
/// kind evaluate to `None` and are ignored by `apply`.
pub trait Neighborhood: Send + Sync {
    /// Kind of move this neighborhood produces.
    fn kind(&self) -> MoveKind;

    /// Enumerates every syntactically valid move, in route-name then
    /// position order. Inter-route neighborhoods only pair routes accepted
    /// by `compatible`.
    fn generate<'a>(
        &'a self,
        solution: &'a Solution,
        compatible: &'a dyn RouteCompatibility,
    ) -> Box<dyn Iterator<Item = Move> + 'a>;

    /// Returns the improvement `old - new` of the touched routes' combined
    /// duration, or `None` if a touched route would exceed the cap.
    fn evaluate(&self, mv: &Move, ctx: &SearchContext<'_>) -> Option<f64>;

    /// Performs the move. Routes emptied by the move are removed.
    fn apply(&self, mv: &Move, solution: &mut Solution);
}

/// Compatible route pairs in name order. With `ordered`, both `(a, b)` and
/// `(b, a)` are produced; otherwise only `a < b`.
pub(crate) fn route_pairs<'a>(
    solution: &'a Solution,
    compatible: &'a dyn RouteCompatibility,
    ordered: bool,
) -> impl Iterator<Item = (RouteId, RouteId)> + 'a {
    solution.route_ids().flat_map(move |r1| {
        solution
            .route_ids()
            .filter(move |&r2| if ordered { r1 != r2 } else { r1 < r2 })
            .filter(move |&r2| compatible.compatible(solution.route(r1), solution.route(r2)))
            .map(move |r2| (r1, r2))
    })
}
