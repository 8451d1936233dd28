//! Neighborhoods and the single-neighborhood search driver.
//!
//! Intra-route:
//! - [`IntraSwap`] — exchange two stops
//! - [`IntraShift`] — move one stop to another position
//! - [`Intra2Opt`] — reverse a segment
//!
//! Inter-route (pairs filtered by a [`RouteCompatibility`] predicate):
//! - [`InterShift`] — move one stop into another route
//! - [`InterSwap`] — exchange one stop of each route
//! - [`Inter2OptStar`] — exchange route tails
//!
//! [`RouteCompatibility`]: crate::compatibility::RouteCompatibility

mod driver;
mod exchange;
mod inter_swap;
mod intra_shift;
mod intra_swap;
mod neighborhood;
mod relocate;
#[cfg(test)]
pub(crate) mod testing;
mod two_opt;

pub(crate) use driver::validate_epsilon;
pub use driver::{ImprovementPolicy, LocalSearch, LocalSearchConfig, LocalSearchResult};
pub use exchange::Inter2OptStar;
pub use inter_swap::InterSwap;
pub use intra_shift::IntraShift;
pub use intra_swap::IntraSwap;
pub use neighborhood::{Neighborhood, SearchContext};
pub use relocate::InterShift;
pub use two_opt::Intra2Opt;

use crate::models::MoveKind;

/// The neighborhood producing moves of `kind`.
///
/// # Examples
///
/// ```
/// use route_vnd::local_search::neighborhood_for;
/// use route_vnd::models::MoveKind;
///
/// for kind in MoveKind::ALL {
///     assert_eq!(neighborhood_for(kind).kind(), kind);
/// }
/// ```
pub fn neighborhood_for(kind: MoveKind) -> Box<dyn Neighborhood> {
    match kind {
        MoveKind::IntraSwap => Box::new(IntraSwap),
        MoveKind::IntraShift => Box::new(IntraShift),
        MoveKind::Intra2Opt => Box::new(Intra2Opt),
        MoveKind::InterShift => Box::new(InterShift),
        MoveKind::InterSwap => Box::new(InterSwap),
        MoveKind::Inter2OptStar => Box::new(Inter2OptStar),
    }
}
