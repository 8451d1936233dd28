//! Nearest-neighbor constructive heuristic.
//!
//! Builds the routes of each shift greedily: starting from the depot, always
//! visit the nearest pending stop of that shift whose visit still lets the
//! route return to the depot within the cap. When no pending stop fits, the
//! route closes and a new one starts.
//!
//! # Complexity
//!
//! O(n²) where n = number of stops.
//!
//! # Reference
//!
//! The simplest constructive heuristic for routing problems. It gives a fast,
//! feasible starting point for the descent in [`crate::vnd`].

use crate::distance::TravelTimeMatrix;
use crate::error::ConfigError;
use crate::models::{Shift, Solution, Stop};
use tracing::{debug, warn};

/// Builds one set of routes per shift with the nearest-neighbor heuristic.
///
/// Day routes are named `day-001`, `day-002`, ... and night routes
/// `night-001`, ... in construction order. A stop is appended only if
/// `elapsed + time(last, stop) + service(stop) + time(stop, depot)` stays
/// within `max_shift_duration`. A stop that cannot fit even on its own gets
/// a single-stop route, which the evaluator then reports as a violation.
///
/// # Errors
///
/// [`ConfigError::InvalidParameter`] for a non-positive or non-finite cap,
/// [`ConfigError::DepotOutOfRange`] / [`ConfigError::StopOutOfRange`] for ids
/// outside the matrix, and any error of [`Solution::from_routes`].
///
/// # Examples
///
/// ```
/// use route_vnd::constructive::nearest_neighbor;
/// use route_vnd::distance::TravelTimeMatrix;
/// use route_vnd::models::{Shift, Stop};
///
/// let pos = [0.0f64, 10.0, 20.0, 30.0];
/// let rows: Vec<Vec<f64>> = pos
///     .iter()
///     .map(|a| pos.iter().map(|b| (a - b).abs()).collect())
///     .collect();
/// let tt = TravelTimeMatrix::from_rows(&rows).unwrap();
/// let stops = [
///     Stop::new(1, 5.0, Shift::Day),
///     Stop::new(2, 5.0, Shift::Day),
///     Stop::new(3, 5.0, Shift::Night),
/// ];
///
/// let solution = nearest_neighbor(0, &tt, &stops, 420.0).unwrap();
/// assert_eq!(solution.num_routes(), 2);
/// assert_eq!(solution.routes()[0].stops(), &[1, 2]);
/// assert_eq!(solution.routes()[1].name(), "night-001");
/// ```
pub fn nearest_neighbor(
    depot: usize,
    travel_times: &TravelTimeMatrix,
    stops: &[Stop],
    max_shift_duration: f64,
) -> Result<Solution, ConfigError> {
    if !(max_shift_duration > 0.0 && max_shift_duration.is_finite()) {
        return Err(ConfigError::InvalidParameter {
            name: "max_shift_duration",
            reason: format!("must be positive and finite, got {max_shift_duration}"),
        });
    }
    let size = travel_times.size();
    if !travel_times.contains(depot) {
        return Err(ConfigError::DepotOutOfRange { depot, size });
    }
    if let Some(stop) = stops.iter().find(|s| !travel_times.contains(s.id())) {
        return Err(ConfigError::StopOutOfRange {
            stop: stop.id(),
            size,
        });
    }

    let mut routes = Vec::new();
    for (shift, prefix) in [(Shift::Day, "day"), (Shift::Night, "night")] {
        let mut pending: Vec<&Stop> = stops.iter().filter(|s| s.shift() == shift).collect();
        pending.sort_by_key(|s| s.id());

        while !pending.is_empty() {
            let mut route = Vec::new();
            let mut current = depot;
            let mut elapsed = 0.0;

            loop {
                // Nearest pending stop that still allows the return leg.
                let next = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| {
                        elapsed
                            + travel_times.get(current, s.id())
                            + s.service_time()
                            + travel_times.get(s.id(), depot)
                            <= max_shift_duration
                    })
                    .min_by(|(_, a), (_, b)| {
                        travel_times
                            .get(current, a.id())
                            .total_cmp(&travel_times.get(current, b.id()))
                    })
                    .map(|(idx, _)| idx);

                match next {
                    Some(idx) => {
                        let stop = pending.remove(idx);
                        elapsed += travel_times.get(current, stop.id()) + stop.service_time();
                        current = stop.id();
                        route.push(current);
                    }
                    None => break,
                }
            }

            if route.is_empty() {
                let idx = nearest_to(travel_times, depot, &pending);
                let stop = pending.remove(idx);
                warn!(
                    stop = stop.id(),
                    max_shift_duration, "stop exceeds the shift cap on its own route"
                );
                route.push(stop.id());
            } else {
                debug!(
                    shift = %shift,
                    stops = route.len(),
                    duration = elapsed + travel_times.get(current, depot),
                    "route closed"
                );
            }

            let name = format!("{prefix}-{:03}", routes.len() + 1);
            routes.push((name, route));
        }
    }

    Solution::from_routes(depot, travel_times, stops, &routes)
}

fn nearest_to(travel_times: &TravelTimeMatrix, from: usize, pending: &[&Stop]) -> usize {
    pending
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            travel_times
                .get(from, a.id())
                .total_cmp(&travel_times.get(from, b.id()))
        })
        .map_or(0, |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::DurationEvaluator;
    use crate::local_search::testing;
    use crate::models::ViolationType;
    use proptest::prelude::*;

    fn line(positions: &[f64]) -> TravelTimeMatrix {
        let rows: Vec<Vec<f64>> = positions
            .iter()
            .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
            .collect();
        TravelTimeMatrix::from_rows(&rows).expect("valid")
    }

    #[test]
    fn test_nn_closes_route_at_cap() {
        let tt = line(&[0.0, 10.0, 20.0, 30.0, 40.0]);
        let stops: Vec<Stop> = (1..=4).map(|id| Stop::new(id, 10.0, Shift::Day)).collect();
        let sol = nearest_neighbor(0, &tt, &stops, 100.0).expect("valid");

        // Stop 4 would end at 60 + 10 + 10 + 40 = 120 > 100.
        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.routes()[0].name(), "day-001");
        assert_eq!(sol.routes()[0].stops(), &[1, 2, 3]);
        assert_eq!(sol.routes()[1].stops(), &[4]);

        let eval = DurationEvaluator::new(&tt, 100.0);
        assert!(eval.is_feasible(&sol));
        assert!((eval.route_duration(&sol, &sol.routes()[0]) - 90.0).abs() < 1e-10);
        assert!((eval.route_duration(&sol, &sol.routes()[1]) - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_nn_single_route_without_cap_pressure() {
        let tt = line(&[0.0, 10.0, 20.0, 30.0, 40.0]);
        let stops: Vec<Stop> = (1..=4).map(|id| Stop::new(id, 10.0, Shift::Day)).collect();
        let sol = nearest_neighbor(0, &tt, &stops, 420.0).expect("valid");
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.routes()[0].stops(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_nn_one_shift_per_route() {
        let tt = line(&[0.0, 10.0, -10.0, 20.0, -20.0, 30.0]);
        let stops: Vec<Stop> = (1..=5)
            .map(|id| Stop::new(id, 5.0, Shift::from_night_flag(id % 2 == 0)))
            .collect();
        let sol = nearest_neighbor(0, &tt, &stops, 420.0).expect("valid");

        let names: Vec<&str> = sol.routes().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["day-001", "night-001"]);
        assert_eq!(sol.routes()[0].stops(), &[1, 3, 5]);
        assert_eq!(sol.routes()[1].stops(), &[2, 4]);
        for route in sol.routes() {
            assert!(route
                .stops()
                .iter()
                .all(|&s| sol.stop(s).map(|st| st.shift()) == Some(route.shift())));
        }
    }

    #[test]
    fn test_nn_chooses_nearest() {
        // Stop 1 is far, stop 2 near.
        let tt = line(&[0.0, 10.0, 1.0]);
        let stops = [Stop::new(1, 0.0, Shift::Night), Stop::new(2, 0.0, Shift::Night)];
        let sol = nearest_neighbor(0, &tt, &stops, 420.0).expect("valid");
        assert_eq!(sol.routes()[0].stops(), &[2, 1]);
    }

    #[test]
    fn test_nn_oversized_stop_gets_own_route() {
        let tt = line(&[0.0, 5.0, 50.0]);
        let stops = [Stop::new(1, 5.0, Shift::Day), Stop::new(2, 5.0, Shift::Day)];
        let sol = nearest_neighbor(0, &tt, &stops, 30.0).expect("valid");

        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.routes()[0].stops(), &[1]);
        assert_eq!(sol.routes()[1].stops(), &[2]);
        let violations = DurationEvaluator::new(&tt, 30.0).violations(&sol);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            &violations[0].kind,
            ViolationType::MaxDurationExceeded { route, .. } if route == "day-002"
        ));
    }

    #[test]
    fn test_nn_custom_depot() {
        // Depot is id 2 at the origin.
        let tt = line(&[10.0, 20.0, 0.0]);
        let stops = [Stop::new(0, 0.0, Shift::Day), Stop::new(1, 0.0, Shift::Day)];
        let sol = nearest_neighbor(2, &tt, &stops, 420.0).expect("valid");
        assert_eq!(sol.depot(), 2);
        assert_eq!(sol.routes()[0].stops(), &[0, 1]);
    }

    #[test]
    fn test_nn_empty() {
        let tt = TravelTimeMatrix::new(1);
        let sol = nearest_neighbor(0, &tt, &[], 420.0).expect("valid");
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_stops(), 0);
    }

    #[test]
    fn test_nn_rejects_bad_input() {
        let tt = TravelTimeMatrix::new(3);
        let stops = [Stop::new(1, 0.0, Shift::Day)];
        assert!(matches!(
            nearest_neighbor(0, &tt, &stops, 0.0),
            Err(ConfigError::InvalidParameter { name: "max_shift_duration", .. })
        ));
        assert!(matches!(
            nearest_neighbor(5, &tt, &stops, 420.0),
            Err(ConfigError::DepotOutOfRange { depot: 5, size: 3 })
        ));
        let outside = [Stop::new(7, 0.0, Shift::Day)];
        assert!(matches!(
            nearest_neighbor(0, &tt, &outside, 420.0),
            Err(ConfigError::StopOutOfRange { stop: 7, size: 3 })
        ));
    }

    proptest! {
        #[test]
        fn prop_nn_respects_cap(inst in testing::instance()) {
            let stops: Vec<Stop> = inst
                .solution
                .stop_ids()
                .into_iter()
                .filter_map(|id| inst.solution.stop(id).copied())
                .collect();
            let cap = inst.max_shift_duration;
            let sol = nearest_neighbor(0, &inst.travel_times, &stops, cap).expect("valid");
            let eval = DurationEvaluator::new(&inst.travel_times, cap);

            prop_assert_eq!(sol.stop_ids(), inst.solution.stop_ids());
            for route in sol.routes() {
                prop_assert!(route.len() == 1 || eval.route_duration(&sol, route) <= cap + 1e-9);
            }
        }
    }
}
