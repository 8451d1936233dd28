//! Randomized fixtures and move-level property checks shared by the
//! neighborhood tests.

use super::{Neighborhood, SearchContext};
use crate::compatibility::CompatibilityRule;
use crate::distance::TravelTimeMatrix;
use crate::evaluation::DurationEvaluator;
use crate::models::{Shift, Solution, Stop};
use proptest::prelude::*;

const MAX_ROUTES: usize = 3;

/// A random asymmetric instance with an arbitrary initial partition.
#[derive(Debug, Clone)]
pub(crate) struct Instance {
    pub travel_times: TravelTimeMatrix,
    pub solution: Solution,
    pub max_shift_duration: f64,
}

pub(crate) fn instance() -> impl Strategy<Value = Instance> {
    (2usize..9)
        .prop_flat_map(|n| {
            let size = n + 1;
            (
                prop::collection::vec(0.0f64..100.0, size * size),
                prop::collection::vec(0.0f64..30.0, n),
                prop::collection::vec(0usize..MAX_ROUTES, n),
                prop::collection::vec(any::<u16>(), n),
                prop::collection::vec(any::<bool>(), MAX_ROUTES),
                150.0f64..600.0,
            )
        })
        .prop_map(|(data, service, route_of, keys, night, cap)| {
            let n = service.len();
            let travel_times = TravelTimeMatrix::from_data(n + 1, data).expect("square");
            let stops: Vec<Stop> = (1..=n)
                .map(|id| {
                    let shift = Shift::from_night_flag(night[route_of[id - 1]]);
                    Stop::new(id, service[id - 1], shift)
                })
                .collect();
            let mut order: Vec<usize> = (1..=n).collect();
            order.sort_by_key(|&id| (keys[id - 1], id));
            let routes: Vec<(String, Vec<usize>)> = (0..MAX_ROUTES)
                .map(|r| {
                    let ids = order
                        .iter()
                        .copied()
                        .filter(|&id| route_of[id - 1] == r)
                        .collect();
                    (format!("R{r}"), ids)
                })
                .collect();
            let solution =
                Solution::from_routes(0, &travel_times, &stops, &routes).expect("valid partition");
            Instance {
                travel_times,
                solution,
                max_shift_duration: cap,
            }
        })
}

/// Checks every move the neighborhood generates against a from-scratch
/// recomputation: the reported delta is exact, feasibility matches the
/// recomputed durations of the touched routes, and no stop is lost.
pub(crate) fn check_moves<N: Neighborhood>(
    nb: &N,
    inst: &Instance,
) -> Result<(), TestCaseError> {
    let sol = &inst.solution;
    let tt = &inst.travel_times;
    let cap = inst.max_shift_duration;
    let evaluator = DurationEvaluator::new(tt, cap);
    let durations = evaluator.route_durations(sol);
    let ctx = SearchContext {
        solution: sol,
        durations: &durations,
        travel_times: tt,
        max_shift_duration: cap,
    };
    let before = evaluator.objective(sol);
    let stop_ids = sol.stop_ids();

    for mv in nb.generate(sol, &CompatibilityRule::Any) {
        prop_assert_eq!(mv.kind(), nb.kind());
        let (r1, r2) = mv.routes();
        let names: Vec<String> = std::iter::once(r1)
            .chain(r2)
            .map(|r| sol.route(r).name().to_string())
            .collect();

        let mut after = sol.clone();
        nb.apply(&mv, &mut after);
        prop_assert_eq!(after.stop_ids(), stop_ids.clone(), "stops changed by {}", mv);
        prop_assert!(after.routes().iter().all(|r| !r.is_empty()));

        let touched: Vec<f64> = names
            .iter()
            .map(|name| {
                after
                    .find_route(name)
                    .map_or(0.0, |id| evaluator.route_duration(&after, after.route(id)))
            })
            .collect();

        match nb.evaluate(&mv, &ctx) {
            Some(delta) => {
                let actual = before - evaluator.objective(&after);
                prop_assert!(
                    (delta - actual).abs() < 1e-6,
                    "{}: reported {} actual {}",
                    mv,
                    delta,
                    actual
                );
                prop_assert!(touched.iter().all(|&d| d <= cap + 1e-6), "{} breaks cap", mv);
            }
            None => {
                prop_assert!(
                    touched.iter().any(|&d| d > cap - 1e-6),
                    "{} rejected although every route fits",
                    mv
                );
            }
        }
    }
    Ok(())
}
