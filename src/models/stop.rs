//! Stop and shift types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The shift a stop (and therefore its route) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Shift {
    /// Day shift.
    #[default]
    Day,
    /// Night shift.
    Night,
}

impl Shift {
    /// Maps a night-shift flag to a shift.
    pub fn from_night_flag(night: bool) -> Self {
        if night {
            Shift::Night
        } else {
            Shift::Day
        }
    }

    /// Returns `true` for [`Shift::Night`].
    pub fn is_night(self) -> bool {
        self == Shift::Night
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Day => f.write_str("Day"),
            Shift::Night => f.write_str("Night"),
        }
    }
}

/// A service stop with its immutable attributes.
///
/// The id indexes the travel-time matrix. Stops are never created or
/// destroyed by the search; they are only reordered and reassigned.
///
/// # Examples
///
/// ```
/// use route_vnd::models::{Shift, Stop};
///
/// let s = Stop::new(3, 12.5, Shift::Night);
/// assert_eq!(s.id(), 3);
/// assert_eq!(s.service_time(), 12.5);
/// assert!(s.shift().is_night());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    id: usize,
    service_time: f64,
    shift: Shift,
}

impl Stop {
    /// Creates a stop.
    pub fn new(id: usize, service_time: f64, shift: Shift) -> Self {
        Self {
            id,
            service_time,
            shift,
        }
    }

    /// Stop id (matrix index).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Service duration at this stop, in minutes.
    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Shift of this stop.
    pub fn shift(&self) -> Shift {
        self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_from_flag() {
        assert_eq!(Shift::from_night_flag(true), Shift::Night);
        assert_eq!(Shift::from_night_flag(false), Shift::Day);
        assert!(!Shift::Day.is_night());
        assert_eq!(Shift::default(), Shift::Day);
    }

    #[test]
    fn test_shift_display() {
        assert_eq!(Shift::Night.to_string(), "Night");
        assert_eq!(Shift::Day.to_string(), "Day");
    }

    #[test]
    fn test_stop_new() {
        let s = Stop::new(4, 7.0, Shift::Day);
        assert_eq!(s.id(), 4);
        assert_eq!(s.service_time(), 7.0);
        assert_eq!(s.shift(), Shift::Day);
    }
}
