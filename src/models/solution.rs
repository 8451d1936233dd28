//! Solution, assignment, and violation types.

use super::{Route, RouteId, Shift, Stop};
use crate::distance::TravelTimeMatrix;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A type of constraint violation in a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Route duration exceeds the shift cap.
    MaxDurationExceeded {
        /// Route name.
        route: String,
        /// Actual duration.
        duration: f64,
        /// Maximum allowed duration.
        max_duration: f64,
    },
    /// A stop sits on a route of the other shift.
    ShiftMismatch {
        /// Route name.
        route: String,
        /// Offending stop.
        stop: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// External route assignment record: stop `stop` is visited at 1-indexed
/// `position` of route `route`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Stop id.
    pub stop: usize,
    /// Route name.
    pub route: String,
    /// 1-indexed position within the route.
    pub position: usize,
}

impl Assignment {
    /// Creates an assignment record.
    pub fn new(stop: usize, route: impl Into<String>, position: usize) -> Self {
        Self {
            stop,
            route: route.into(),
            position,
        }
    }
}

/// A partition of every stop into depot-anchored routes.
///
/// Routes are kept sorted by name, which fixes the enumeration order of
/// every neighborhood and makes the search reproducible. Every stop with
/// attributes appears in exactly one route at exactly one position.
///
/// # Examples
///
/// ```
/// use route_vnd::distance::TravelTimeMatrix;
/// use route_vnd::models::{Assignment, Shift, Solution, Stop};
///
/// let tt = TravelTimeMatrix::new(4);
/// let stops = vec![
///     Stop::new(1, 5.0, Shift::Day),
///     Stop::new(2, 5.0, Shift::Day),
///     Stop::new(3, 5.0, Shift::Night),
/// ];
/// let assignments = vec![
///     Assignment::new(2, "B", 1),
///     Assignment::new(1, "A", 1),
///     Assignment::new(3, "B-night", 1),
/// ];
/// let sol = Solution::from_assignments(0, &tt, &stops, &assignments).unwrap();
/// assert_eq!(sol.num_routes(), 3);
/// assert_eq!(sol.routes()[0].name(), "A");
/// assert_eq!(sol.num_stops(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    depot: usize,
    stops: Vec<Option<Stop>>,
    routes: Vec<Route>,
}

impl Solution {
    /// Builds a solution from external 1-indexed route assignments.
    ///
    /// Validates that the depot and every stop index the matrix, that each
    /// stop is defined and assigned exactly once, that positions of each
    /// route are exactly `1..=n`, and that each route has a single shift.
    pub fn from_assignments(
        depot: usize,
        travel_times: &TravelTimeMatrix,
        stops: &[Stop],
        assignments: &[Assignment],
    ) -> Result<Self, ConfigError> {
        let size = travel_times.size();
        if !travel_times.contains(depot) {
            return Err(ConfigError::DepotOutOfRange { depot, size });
        }

        let mut table: Vec<Option<Stop>> = vec![None; size];
        for stop in stops {
            let id = stop.id();
            if id == depot {
                return Err(ConfigError::DepotAssigned { depot });
            }
            if !travel_times.contains(id) {
                return Err(ConfigError::StopOutOfRange { stop: id, size });
            }
            let service = stop.service_time();
            if !service.is_finite() || service < 0.0 {
                return Err(ConfigError::InvalidServiceTime {
                    stop: id,
                    value: service,
                });
            }
            if table[id].replace(*stop).is_some() {
                return Err(ConfigError::DuplicateStop { stop: id });
            }
        }

        let mut grouped: BTreeMap<&str, Vec<(usize, usize)>> = BTreeMap::new();
        let mut seen = HashSet::with_capacity(assignments.len());
        for a in assignments {
            if a.stop == depot {
                return Err(ConfigError::DepotAssigned { depot });
            }
            if !travel_times.contains(a.stop) {
                return Err(ConfigError::StopOutOfRange { stop: a.stop, size });
            }
            if table[a.stop].is_none() {
                return Err(ConfigError::UnknownStop { stop: a.stop });
            }
            if !seen.insert(a.stop) {
                return Err(ConfigError::DuplicateStop { stop: a.stop });
            }
            if a.position == 0 {
                return Err(ConfigError::InvalidPosition {
                    route: a.route.clone(),
                    position: a.position,
                });
            }
            grouped
                .entry(a.route.as_str())
                .or_default()
                .push((a.position, a.stop));
        }

        if let Some(stop) = stops.iter().find(|s| !seen.contains(&s.id())) {
            return Err(ConfigError::UnassignedStop { stop: stop.id() });
        }

        let mut routes = Vec::with_capacity(grouped.len());
        for (name, mut visits) in grouped {
            visits.sort_unstable();
            for (expected, &(found, _)) in (1..).zip(&visits) {
                if found != expected {
                    return Err(ConfigError::NonContiguousPositions {
                        route: name.to_string(),
                        expected,
                        found,
                    });
                }
            }
            let ids: Vec<usize> = visits.into_iter().map(|(_, s)| s).collect();
            let shift = route_shift(name, &ids, &table)?;
            routes.push(Route::with_stops(name, shift, ids));
        }

        Ok(Self {
            depot,
            stops: table,
            routes,
        })
    }

    /// Builds a solution from named stop sequences.
    ///
    /// Convenience over [`Solution::from_assignments`] for callers that
    /// already hold ordered routes.
    pub fn from_routes<N: AsRef<str>>(
        depot: usize,
        travel_times: &TravelTimeMatrix,
        stops: &[Stop],
        routes: &[(N, Vec<usize>)],
    ) -> Result<Self, ConfigError> {
        let assignments: Vec<Assignment> = routes
            .iter()
            .flat_map(|(name, ids)| {
                ids.iter()
                    .enumerate()
                    .map(move |(i, &s)| Assignment::new(s, name.as_ref(), i + 1))
            })
            .collect();
        Self::from_assignments(depot, travel_times, stops, &assignments)
    }

    /// Depot id: start and end of every route.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Routes sorted by name.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Route behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this solution.
    pub fn route(&self, id: RouteId) -> &Route {
        &self.routes[id.index()]
    }

    pub(crate) fn route_mut(&mut self, id: RouteId) -> &mut Route {
        &mut self.routes[id.index()]
    }

    /// Mutable access to two distinct routes at once.
    pub(crate) fn route_pair_mut(&mut self, a: RouteId, b: RouteId) -> (&mut Route, &mut Route) {
        assert_ne!(a, b, "route pair must be distinct");
        if a.index() < b.index() {
            let (left, right) = self.routes.split_at_mut(b.index());
            (&mut left[a.index()], &mut right[0])
        } else {
            let (left, right) = self.routes.split_at_mut(a.index());
            (&mut right[0], &mut left[b.index()])
        }
    }

    /// Handles of all routes, in name order.
    pub fn route_ids(&self) -> impl Iterator<Item = RouteId> {
        (0..self.routes.len()).map(RouteId)
    }

    /// Looks a route up by name.
    pub fn find_route(&self, name: &str) -> Option<RouteId> {
        self.routes
            .binary_search_by(|r| r.name().cmp(name))
            .ok()
            .map(RouteId)
    }

    /// Number of routes.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of stops served across all routes.
    pub fn num_stops(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    /// Attributes of a stop, if it is known.
    pub fn stop(&self, id: usize) -> Option<&Stop> {
        self.stops.get(id).and_then(Option::as_ref)
    }

    /// Service time of a stop; zero for the depot.
    #[inline]
    pub fn service_time(&self, id: usize) -> f64 {
        self.stop(id).map_or(0.0, Stop::service_time)
    }

    /// Total service time of the given stops.
    pub fn service_time_of(&self, stops: &[usize]) -> f64 {
        stops.iter().map(|&s| self.service_time(s)).sum()
    }

    /// Sorted ids of every stop served, for membership comparisons.
    pub fn stop_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .routes
            .iter()
            .flat_map(|r| r.stops().iter().copied())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Exports the solution as 1-indexed assignment records.
    pub fn to_assignments(&self) -> Vec<Assignment> {
        self.routes
            .iter()
            .flat_map(|r| {
                r.positions()
                    .map(move |(pos, stop)| Assignment::new(stop, r.name(), pos))
            })
            .collect()
    }

    /// Drops routes left without stops by an inter-route move.
    ///
    /// Invalidates every outstanding [`RouteId`].
    pub(crate) fn prune_empty_routes(&mut self) {
        self.routes.retain(|r| !r.is_empty());
    }
}

/// Shift shared by all stops of a route.
fn route_shift(name: &str, ids: &[usize], table: &[Option<Stop>]) -> Result<Shift, ConfigError> {
    let mut shifts = ids.iter().filter_map(|&s| table[s].map(|st| st.shift()));
    let first = shifts.next().unwrap_or_default();
    if shifts.any(|s| s != first) {
        return Err(ConfigError::MixedShifts {
            route: name.to_string(),
        });
    }
    Ok(first)
}
