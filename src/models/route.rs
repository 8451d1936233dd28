//! Route types.

use super::Shift;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal handle of a route inside a [`Solution`](super::Solution).
///
/// Routes are kept sorted by name, so a `RouteId` follows route-name order.
/// Handles are only stable until the next structural change of the
/// solution; moves never outlive the snapshot they were generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteId(pub usize);

impl RouteId {
    /// Index into the solution's route list.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An ordered sequence of stop visits performed within one shift.
///
/// A route starts and ends at the depot, which is not stored in the
/// sequence. Positions are 0-indexed internally.
///
/// # Examples
///
/// ```
/// use route_vnd::models::{Route, Shift};
///
/// let route = Route::with_stops("R1", Shift::Day, vec![4, 2, 7]);
/// assert_eq!(route.len(), 3);
/// assert_eq!(route.name(), "R1");
/// assert_eq!(route.predecessor(0, 0), 0);
/// assert_eq!(route.successor(1, 0), 7);
/// assert_eq!(route.successor(2, 0), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    name: String,
    shift: Shift,
    stops: Vec<usize>,
}

impl Route {
    /// Creates an empty route.
    pub fn new(name: impl Into<String>, shift: Shift) -> Self {
        Self::with_stops(name, shift, Vec::new())
    }

    /// Creates a route visiting `stops` in order.
    pub fn with_stops(name: impl Into<String>, shift: Shift, stops: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            shift,
            stops,
        }
    }

    /// Route name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shift shared by every stop on this route.
    pub fn shift(&self) -> Shift {
        self.shift
    }

    /// Stop ids in visit order (depot excluded).
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    pub(crate) fn stops_mut(&mut self) -> &mut Vec<usize> {
        &mut self.stops
    }

    /// Number of stops (depot excluded).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if this route visits no stop.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stop visited right before position `pos`, or `depot` at the start.
    #[inline]
    pub fn predecessor(&self, pos: usize, depot: usize) -> usize {
        if pos == 0 {
            depot
        } else {
            self.stops[pos - 1]
        }
    }

    /// Stop visited right after position `pos`, or `depot` at the end.
    #[inline]
    pub fn successor(&self, pos: usize, depot: usize) -> usize {
        if pos + 1 >= self.stops.len() {
            depot
        } else {
            self.stops[pos + 1]
        }
    }

    /// `(position, stop)` pairs with 1-indexed positions, as exposed to
    /// external collaborators.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.stops.iter().enumerate().map(|(i, &s)| (i + 1, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_empty() {
        let r = Route::new("R0", Shift::Night);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.shift(), Shift::Night);
    }

    #[test]
    fn test_neighbors_with_custom_depot() {
        let r = Route::with_stops("R", Shift::Day, vec![1, 2]);
        assert_eq!(r.predecessor(0, 9), 9);
        assert_eq!(r.predecessor(1, 9), 1);
        assert_eq!(r.successor(0, 9), 2);
        assert_eq!(r.successor(1, 9), 9);
    }

    #[test]
    fn test_positions_are_one_indexed() {
        let r = Route::with_stops("R", Shift::Day, vec![5, 3, 8]);
        let pos: Vec<_> = r.positions().collect();
        assert_eq!(pos, vec![(1, 5), (2, 3), (3, 8)]);
    }

    #[test]
    fn test_route_id_order() {
        assert!(RouteId(0) < RouteId(1));
        assert_eq!(RouteId(3).index(), 3);
        assert_eq!(RouteId(3).to_string(), "#3");
    }
}
