//! Read-only reporting view over a solution.

use super::DurationEvaluator;
use crate::models::{Shift, Solution};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound, in minutes, on the average service time figure reported
/// per route.
const MAX_AVG_SERVICE_CEILING: f64 = 20.0;

/// Per-route figures, in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Route name.
    pub route: String,
    /// Route shift.
    pub shift: Shift,
    /// Number of stops.
    pub stops: usize,
    /// Travel time including the depot legs.
    pub travel_time: f64,
    /// Sum of service times.
    pub service_time: f64,
    /// Travel plus service.
    pub total_time: f64,
    /// Largest average service time per stop that would still fit the
    /// cap given this route's travel, capped at 20 minutes.
    pub max_avg_service: f64,
}

/// Aggregate figures over a group of routes, in minutes.
///
/// Average, min and max are zero for an empty group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftStats {
    /// Number of routes.
    pub num_routes: usize,
    /// Mean route duration.
    pub avg_duration: f64,
    /// Shortest route duration.
    pub min_duration: f64,
    /// Longest route duration.
    pub max_duration: f64,
    /// Total travel time.
    pub total_travel: f64,
    /// Total service time.
    pub total_service: f64,
    /// Routes whose duration exceeds the cap.
    pub violated_routes: usize,
}

impl ShiftStats {
    fn from_routes<'a>(routes: impl Iterator<Item = &'a RouteMetrics>, cap: f64) -> Self {
        let mut stats = ShiftStats::default();
        let mut total = 0.0;
        for r in routes {
            if stats.num_routes == 0 {
                stats.min_duration = r.total_time;
                stats.max_duration = r.total_time;
            } else {
                stats.min_duration = stats.min_duration.min(r.total_time);
                stats.max_duration = stats.max_duration.max(r.total_time);
            }
            stats.num_routes += 1;
            total += r.total_time;
            stats.total_travel += r.travel_time;
            stats.total_service += r.service_time;
            if r.total_time > cap {
                stats.violated_routes += 1;
            }
        }
        if stats.num_routes > 0 {
            stats.avg_duration = total / stats.num_routes as f64;
        }
        stats
    }

    fn write_hours(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Number of routes:   {}", self.num_routes)?;
        writeln!(f, "  Avg shift length:   {:.5} h", self.avg_duration / 60.0)?;
        writeln!(f, "  Shortest shift:     {:.5} h", self.min_duration / 60.0)?;
        writeln!(f, "  Longest shift:      {:.5} h", self.max_duration / 60.0)?;
        writeln!(f, "  Total travel time:  {:.5} h", self.total_travel / 60.0)?;
        writeln!(f, "  Total service time: {:.5} h", self.total_service / 60.0)?;
        writeln!(f, "  Violated routes:    {}", self.violated_routes)
    }
}

/// Per-route metrics plus day, night, and overall aggregates.
///
/// # Examples
///
/// ```
/// use route_vnd::distance::TravelTimeMatrix;
/// use route_vnd::evaluation::{DurationEvaluator, SolutionReport};
/// use route_vnd::models::{Shift, Solution, Stop};
///
/// let tt = TravelTimeMatrix::from_rows(&[
///     vec![0.0, 30.0, 60.0],
///     vec![30.0, 0.0, 10.0],
///     vec![60.0, 10.0, 0.0],
/// ])
/// .unwrap();
/// let stops = vec![Stop::new(1, 15.0, Shift::Day), Stop::new(2, 15.0, Shift::Night)];
/// let sol = Solution::from_routes(0, &tt, &stops, &[("D", vec![1]), ("N", vec![2])]).unwrap();
///
/// let report = SolutionReport::new(&sol, &DurationEvaluator::new(&tt, 420.0));
/// assert_eq!(report.day.num_routes, 1);
/// assert_eq!(report.night.num_routes, 1);
/// assert!((report.objective - 210.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    /// One entry per route, in name order.
    pub routes: Vec<RouteMetrics>,
    /// Day-shift aggregate.
    pub day: ShiftStats,
    /// Night-shift aggregate.
    pub night: ShiftStats,
    /// Aggregate over all routes.
    pub overall: ShiftStats,
    /// Sum of every route's duration.
    pub objective: f64,
}

impl SolutionReport {
    /// Computes the report for a solution.
    pub fn new(solution: &Solution, evaluator: &DurationEvaluator<'_>) -> Self {
        let cap = evaluator.max_shift_duration();
        let routes: Vec<RouteMetrics> = solution
            .routes()
            .iter()
            .map(|route| {
                let travel_time = evaluator.travel_time(solution, route);
                let service_time = evaluator.service_time(solution, route);
                let max_avg_service = if route.is_empty() {
                    0.0
                } else {
                    ((cap - travel_time) / route.len() as f64).min(MAX_AVG_SERVICE_CEILING)
                };
                RouteMetrics {
                    route: route.name().to_string(),
                    shift: route.shift(),
                    stops: route.len(),
                    travel_time,
                    service_time,
                    total_time: travel_time + service_time,
                    max_avg_service,
                }
            })
            .collect();

        let day = ShiftStats::from_routes(routes.iter().filter(|r| r.shift == Shift::Day), cap);
        let night = ShiftStats::from_routes(routes.iter().filter(|r| r.shift == Shift::Night), cap);
        let overall = ShiftStats::from_routes(routes.iter(), cap);
        let objective = routes.iter().map(|r| r.total_time).sum();

        Self {
            routes,
            day,
            night,
            overall,
            objective,
        }
    }
}

impl fmt::Display for SolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Day routes:")?;
        self.day.write_hours(f)?;
        writeln!(f, "Night routes:")?;
        self.night.write_hours(f)?;
        writeln!(f, "Overall:")?;
        self.overall.write_hours(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TravelTimeMatrix;
    use crate::models::Stop;

    fn setup() -> (TravelTimeMatrix, Solution) {
        let tt = TravelTimeMatrix::from_rows(&[
            vec![0.0, 30.0, 60.0, 90.0],
            vec![30.0, 0.0, 10.0, 20.0],
            vec![60.0, 10.0, 0.0, 10.0],
            vec![90.0, 20.0, 10.0, 0.0],
        ])
        .expect("valid");
        let stops = vec![
            Stop::new(1, 15.0, Shift::Day),
            Stop::new(2, 15.0, Shift::Day),
            Stop::new(3, 300.0, Shift::Night),
        ];
        let sol = Solution::from_routes(
            0,
            &tt,
            &stops,
            &[("D1", vec![1]), ("D2", vec![2]), ("N1", vec![3])],
        )
        .expect("valid");
        (tt, sol)
    }

    #[test]
    fn test_route_metrics() {
        let (tt, sol) = setup();
        let report = SolutionReport::new(&sol, &DurationEvaluator::new(&tt, 420.0));
        let d1 = &report.routes[0];
        assert_eq!(d1.route, "D1");
        assert_eq!(d1.stops, 1);
        assert!((d1.travel_time - 60.0).abs() < 1e-10);
        assert!((d1.total_time - 75.0).abs() < 1e-10);
        // (420 - 60) / 1 capped at 20
        assert!((d1.max_avg_service - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_shift_aggregates() {
        let (tt, sol) = setup();
        let report = SolutionReport::new(&sol, &DurationEvaluator::new(&tt, 420.0));
        assert_eq!(report.day.num_routes, 2);
        assert!((report.day.min_duration - 75.0).abs() < 1e-10);
        assert!((report.day.max_duration - 135.0).abs() < 1e-10);
        assert!((report.day.avg_duration - 105.0).abs() < 1e-10);
        assert_eq!(report.night.num_routes, 1);
        // 180 travel + 300 service > 420
        assert_eq!(report.night.violated_routes, 1);
        assert_eq!(report.overall.violated_routes, 1);
        assert!((report.objective - 690.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_group_is_zero() {
        let stats = ShiftStats::from_routes(std::iter::empty(), 420.0);
        assert_eq!(stats, ShiftStats::default());
    }

    #[test]
    fn test_display_in_hours() {
        let (tt, sol) = setup();
        let report = SolutionReport::new(&sol, &DurationEvaluator::new(&tt, 420.0));
        let text = report.to_string();
        assert!(text.contains("Night routes:"));
        assert!(text.contains("Longest shift:      8.00000 h"));
    }
}
