//! Move descriptors.

use super::RouteId;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structural kind of a move, one per neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoveKind {
    /// Exchange two stops of one route.
    IntraSwap,
    /// Relocate one stop within its route.
    IntraShift,
    /// Reverse a segment of one route.
    Intra2Opt,
    /// Relocate one stop to another route.
    InterShift,
    /// Exchange two stops between routes.
    InterSwap,
    /// Exchange the tails of two routes.
    Inter2OptStar,
}

impl MoveKind {
    /// All kinds, in the default descent order.
    pub const ALL: [MoveKind; 6] = [
        MoveKind::IntraShift,
        MoveKind::IntraSwap,
        MoveKind::Intra2Opt,
        MoveKind::InterShift,
        MoveKind::InterSwap,
        MoveKind::Inter2OptStar,
    ];

    /// Snake-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            MoveKind::IntraSwap => "intra_swap",
            MoveKind::IntraShift => "intra_shift",
            MoveKind::Intra2Opt => "intra_2opt",
            MoveKind::InterShift => "inter_shift",
            MoveKind::InterSwap => "inter_swap",
            MoveKind::Inter2OptStar => "inter_2opt_star",
        }
    }

    /// Returns `true` if moves of this kind touch two routes.
    pub fn is_inter_route(self) -> bool {
        matches!(
            self,
            MoveKind::InterShift | MoveKind::InterSwap | MoveKind::Inter2OptStar
        )
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoveKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        MoveKind::ALL
            .into_iter()
            .find(|k| k.as_str() == key || k.as_str().replace('_', "") == key)
            .ok_or_else(|| ConfigError::UnknownNeighborhood(s.to_string()))
    }
}

/// A candidate perturbation of a solution.
///
/// A move carries route handles and 0-indexed positions only: it never
/// caches route content or cost, and is only meaningful against the
/// solution snapshot it was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Exchange the stops at positions `i < j` of `route`.
    IntraSwap {
        /// Route.
        route: RouteId,
        /// First position.
        i: usize,
        /// Second position.
        j: usize,
    },
    /// Remove the stop at `i` and reinsert it at `j` of the route with
    /// `i` removed.
    IntraShift {
        /// Route.
        route: RouteId,
        /// Removal position.
        i: usize,
        /// Insertion position after removal.
        j: usize,
    },
    /// Reverse the closed segment `[i..=j]`.
    Intra2Opt {
        /// Route.
        route: RouteId,
        /// Segment start.
        i: usize,
        /// Segment end.
        j: usize,
    },
    /// Move the stop at `i` of `from` to position `j` of `to`.
    InterShift {
        /// Donor route.
        from: RouteId,
        /// Recipient route.
        to: RouteId,
        /// Position in the donor.
        i: usize,
        /// Insertion position in the recipient.
        j: usize,
    },
    /// Exchange the stop at `i` of `r1` with the stop at `j` of `r2`.
    InterSwap {
        /// First route.
        r1: RouteId,
        /// Second route.
        r2: RouteId,
        /// Position in `r1`.
        i: usize,
        /// Position in `r2`.
        j: usize,
    },
    /// Exchange the tail after position `i` of `r1` with the tail after
    /// position `j` of `r2`.
    Inter2OptStar {
        /// First route.
        r1: RouteId,
        /// Second route.
        r2: RouteId,
        /// Last kept position of `r1`.
        i: usize,
        /// Last kept position of `r2`.
        j: usize,
    },
}

impl Move {
    /// Kind of this move.
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::IntraSwap { .. } => MoveKind::IntraSwap,
            Move::IntraShift { .. } => MoveKind::IntraShift,
            Move::Intra2Opt { .. } => MoveKind::Intra2Opt,
            Move::InterShift { .. } => MoveKind::InterShift,
            Move::InterSwap { .. } => MoveKind::InterSwap,
            Move::Inter2OptStar { .. } => MoveKind::Inter2OptStar,
        }
    }

    /// Routes touched by this move (one or two).
    pub fn routes(&self) -> (RouteId, Option<RouteId>) {
        match *self {
            Move::IntraSwap { route, .. }
            | Move::IntraShift { route, .. }
            | Move::Intra2Opt { route, .. } => (route, None),
            Move::InterShift { from, to, .. } => (from, Some(to)),
            Move::InterSwap { r1, r2, .. } | Move::Inter2OptStar { r1, r2, .. } => {
                (r1, Some(r2))
            }
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::IntraSwap { route, i, j }
            | Move::IntraShift { route, i, j }
            | Move::Intra2Opt { route, i, j } => {
                write!(f, "{}({route}, {i}, {j})", self.kind())
            }
            Move::InterShift { from: a, to: b, i, j }
            | Move::InterSwap { r1: a, r2: b, i, j }
            | Move::Inter2OptStar { r1: a, r2: b, i, j } => {
                write!(f, "{}({a}, {b}, {i}, {j})", self.kind())
            }
        }
    }
}
