//! Route-compatibility predicates for inter-route moves.

use crate::error::ConfigError;
use crate::models::Route;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decides whether two routes may exchange stops.
///
/// Inter-route neighborhoods filter route pairs through this predicate
/// before enumerating positions. Closures of the right shape implement it
/// directly.
///
/// # Examples
///
/// ```
/// use route_vnd::compatibility::RouteCompatibility;
/// use route_vnd::models::{Route, Shift};
///
/// let same_prefix = |a: &Route, b: &Route| a.name()[..1] == b.name()[..1];
/// let a = Route::new("A1", Shift::Day);
/// let b = Route::new("A2", Shift::Night);
/// assert!(same_prefix.compatible(&a, &b));
/// ```
pub trait RouteCompatibility {
    /// Returns `true` if stops may move between `a` and `b`.
    fn compatible(&self, a: &Route, b: &Route) -> bool;
}

impl<F> RouteCompatibility for F
where
    F: Fn(&Route, &Route) -> bool,
{
    fn compatible(&self, a: &Route, b: &Route) -> bool {
        self(a, b)
    }
}

/// Built-in compatibility rules, selectable by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompatibilityRule {
    /// Only routes of the same shift exchange stops.
    #[default]
    SameShift,
    /// Any two routes may exchange stops.
    Any,
}

impl RouteCompatibility for CompatibilityRule {
    fn compatible(&self, a: &Route, b: &Route) -> bool {
        match self {
            CompatibilityRule::SameShift => a.shift() == b.shift(),
            CompatibilityRule::Any => true,
        }
    }
}

impl fmt::Display for CompatibilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityRule::SameShift => f.write_str("same_shift"),
            CompatibilityRule::Any => f.write_str("any"),
        }
    }
}

impl FromStr for CompatibilityRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "same_shift" | "same_night_shift" | "shift" => Ok(CompatibilityRule::SameShift),
            "any" | "all" => Ok(CompatibilityRule::Any),
            _ => Err(ConfigError::UnknownCompatibility(s.to_string())),
        }
    }
}
