//! Route duration evaluator.

use crate::distance::TravelTimeMatrix;
use crate::models::{Route, Solution, Violation, ViolationType};

/// Computes route durations from scratch and checks the shift cap.
///
/// A route's duration is the travel time `depot → first → … → last → depot`
/// plus the service time of every stop. An empty route lasts zero minutes.
///
/// # Examples
///
/// ```
/// use route_vnd::distance::TravelTimeMatrix;
/// use route_vnd::evaluation::DurationEvaluator;
/// use route_vnd::models::{Shift, Solution, Stop};
///
/// let tt = TravelTimeMatrix::from_rows(&[
///     vec![0.0, 5.0, 8.0],
///     vec![5.0, 0.0, 3.0],
///     vec![8.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// let stops = vec![Stop::new(1, 10.0, Shift::Day), Stop::new(2, 10.0, Shift::Day)];
/// let sol = Solution::from_routes(0, &tt, &stops, &[("R1", vec![1, 2])]).unwrap();
///
/// let evaluator = DurationEvaluator::new(&tt, 420.0);
/// // travel 5 + 3 + 8, service 10 + 10
/// assert!((evaluator.objective(&sol) - 36.0).abs() < 1e-10);
/// assert!(evaluator.violations(&sol).is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DurationEvaluator<'a> {
    travel_times: &'a TravelTimeMatrix,
    max_shift_duration: f64,
}

impl<'a> DurationEvaluator<'a> {
    /// Creates an evaluator over the given matrix and shift cap (minutes).
    pub fn new(travel_times: &'a TravelTimeMatrix, max_shift_duration: f64) -> Self {
        Self {
            travel_times,
            max_shift_duration,
        }
    }

    /// The matrix this evaluator reads from.
    pub fn travel_times(&self) -> &'a TravelTimeMatrix {
        self.travel_times
    }

    /// Shift cap in minutes.
    pub fn max_shift_duration(&self) -> f64 {
        self.max_shift_duration
    }

    /// Travel part of a route's duration.
    pub fn travel_time(&self, solution: &Solution, route: &Route) -> f64 {
        self.travel_times
            .closed_path_time(solution.depot(), route.stops())
    }

    /// Service part of a route's duration.
    pub fn service_time(&self, solution: &Solution, route: &Route) -> f64 {
        solution.service_time_of(route.stops())
    }

    /// Travel plus service time of a route.
    pub fn route_duration(&self, solution: &Solution, route: &Route) -> f64 {
        self.travel_time(solution, route) + self.service_time(solution, route)
    }

    /// Durations of every route, indexed by [`RouteId`](crate::models::RouteId).
    pub fn route_durations(&self, solution: &Solution) -> Vec<f64> {
        solution
            .routes()
            .iter()
            .map(|r| self.route_duration(solution, r))
            .collect()
    }

    /// Whole-solution objective: sum of every route's duration.
    pub fn objective(&self, solution: &Solution) -> f64 {
        solution
            .routes()
            .iter()
            .map(|r| self.route_duration(solution, r))
            .sum()
    }

    /// Cap and shift violations across the solution.
    pub fn violations(&self, solution: &Solution) -> Vec<Violation> {
        let mut violations = Vec::new();
        for route in solution.routes() {
            let duration = self.route_duration(solution, route);
            if duration > self.max_shift_duration {
                violations.push(Violation::new(ViolationType::MaxDurationExceeded {
                    route: route.name().to_string(),
                    duration,
                    max_duration: self.max_shift_duration,
                }));
            }
            for &stop in route.stops() {
                let mismatch = solution
                    .stop(stop)
                    .is_some_and(|s| s.shift() != route.shift());
                if mismatch {
                    violations.push(Violation::new(ViolationType::ShiftMismatch {
                        route: route.name().to_string(),
                        stop,
                    }));
                }
            }
        }
        violations
    }

    /// Returns `true` if no route violates the cap or its shift.
    pub fn is_feasible(&self, solution: &Solution) -> bool {
        self.violations(solution).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Shift, Stop};

    fn setup() -> (TravelTimeMatrix, Solution) {
        let tt = TravelTimeMatrix::from_rows(&[
            vec![0.0, 5.0, 8.0, 12.0],
            vec![6.0, 0.0, 3.0, 7.0],
            vec![9.0, 2.0, 0.0, 4.0],
            vec![11.0, 7.0, 5.0, 0.0],
        ])
        .expect("valid");
        let stops = vec![
            Stop::new(1, 10.0, Shift::Day),
            Stop::new(2, 20.0, Shift::Day),
            Stop::new(3, 5.0, Shift::Night),
        ];
        let sol = Solution::from_routes(0, &tt, &stops, &[("D", vec![1, 2]), ("N", vec![3])])
            .expect("valid");
        (tt, sol)
    }

    #[test]
    fn test_route_duration_parts() {
        let (tt, sol) = setup();
        let ev = DurationEvaluator::new(&tt, 420.0);
        let d = &sol.routes()[0];
        // 0→1→2→0 = 5 + 3 + 9
        assert!((ev.travel_time(&sol, d) - 17.0).abs() < 1e-10);
        assert!((ev.service_time(&sol, d) - 30.0).abs() < 1e-10);
        assert!((ev.route_duration(&sol, d) - 47.0).abs() < 1e-10);
    }

    #[test]
    fn test_objective_sums_routes() {
        let (tt, sol) = setup();
        let ev = DurationEvaluator::new(&tt, 420.0);
        // D = 47, N = 12 + 11 + 5 = 28
        assert!((ev.objective(&sol) - 75.0).abs() < 1e-10);
        let durations = ev.route_durations(&sol);
        assert_eq!(durations.len(), 2);
        assert!((durations[1] - 28.0).abs() < 1e-10);
    }

    #[test]
    fn test_max_duration_violated() {
        let (tt, sol) = setup();
        let ev = DurationEvaluator::new(&tt, 30.0);
        let violations = ev.violations(&sol);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            &violations[0].kind,
            ViolationType::MaxDurationExceeded { route, .. } if route == "D"
        ));
        assert!(!ev.is_feasible(&sol));
    }

    #[test]
    fn test_shift_mismatch_detected() {
        let (tt, mut sol) = setup();
        let n = sol.find_route("N").expect("exists");
        let d = sol.find_route("D").expect("exists");
        let (dr, nr) = sol.route_pair_mut(d, n);
        let moved = dr.stops_mut().pop().expect("non-empty");
        nr.stops_mut().push(moved);
        let ev = DurationEvaluator::new(&tt, 420.0);
        let violations = ev.violations(&sol);
        assert_eq!(
            violations,
            vec![Violation::new(ViolationType::ShiftMismatch {
                route: "N".into(),
                stop: 2
            })]
        );
    }
}
