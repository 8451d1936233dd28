//! Configuration and input validation errors.
//!
//! Search itself never fails: an infeasible move is a normal `None` from
//! [`Neighborhood::evaluate`](crate::local_search::Neighborhood::evaluate).
//! Everything here is raised while building inputs or configuration.

use std::fmt;

/// An invalid input or configuration detected before the search starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The travel-time matrix has no rows.
    EmptyMatrix,
    /// A matrix row does not have as many entries as there are rows.
    MatrixNotSquare {
        /// Number of rows.
        rows: usize,
        /// Offending row index.
        row: usize,
        /// Length of the offending row.
        len: usize,
    },
    /// Flat matrix data does not hold `size * size` entries.
    MatrixSizeMismatch {
        /// Declared side length.
        size: usize,
        /// Number of values supplied.
        len: usize,
    },
    /// The depot id is not a valid matrix index.
    DepotOutOfRange {
        /// Depot id.
        depot: usize,
        /// Matrix size.
        size: usize,
    },
    /// The depot appears as a stop inside a route.
    DepotAssigned {
        /// Depot id.
        depot: usize,
    },
    /// A stop id is not a valid matrix index.
    StopOutOfRange {
        /// Stop id.
        stop: usize,
        /// Matrix size.
        size: usize,
    },
    /// An assignment names a stop with no attributes.
    UnknownStop {
        /// Stop id.
        stop: usize,
    },
    /// A stop is defined or assigned more than once.
    DuplicateStop {
        /// Stop id.
        stop: usize,
    },
    /// A stop has attributes but no route assignment.
    UnassignedStop {
        /// Stop id.
        stop: usize,
    },
    /// A position is not 1-indexed.
    InvalidPosition {
        /// Route name.
        route: String,
        /// Offending position.
        position: usize,
    },
    /// Positions within a route have gaps or duplicates.
    NonContiguousPositions {
        /// Route name.
        route: String,
        /// Position expected next.
        expected: usize,
        /// Position found instead.
        found: usize,
    },
    /// Stops of one route disagree on their shift.
    MixedShifts {
        /// Route name.
        route: String,
    },
    /// A service time is negative or not finite.
    InvalidServiceTime {
        /// Stop id.
        stop: usize,
        /// Offending value.
        value: f64,
    },
    /// Unknown improvement policy identifier.
    UnknownPolicy(String),
    /// Unknown route-compatibility identifier.
    UnknownCompatibility(String),
    /// Unknown acceptance strategy identifier.
    UnknownAcceptance(String),
    /// Unknown neighborhood identifier.
    UnknownNeighborhood(String),
    /// A numeric parameter is out of its valid range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyMatrix => write!(f, "travel-time matrix is empty"),
            ConfigError::MatrixNotSquare { rows, row, len } => write!(
                f,
                "travel-time matrix is not square: row {row} has {len} entries, expected {rows}"
            ),
            ConfigError::MatrixSizeMismatch { size, len } => write!(
                f,
                "travel-time data has {len} values, expected {size}x{size}"
            ),
            ConfigError::DepotOutOfRange { depot, size } => {
                write!(f, "depot {depot} is outside the {size}x{size} matrix")
            }
            ConfigError::DepotAssigned { depot } => {
                write!(f, "depot {depot} cannot be assigned to a route")
            }
            ConfigError::StopOutOfRange { stop, size } => {
                write!(f, "stop {stop} is outside the {size}x{size} matrix")
            }
            ConfigError::UnknownStop { stop } => write!(f, "stop {stop} has no attributes"),
            ConfigError::DuplicateStop { stop } => write!(f, "stop {stop} appears more than once"),
            ConfigError::UnassignedStop { stop } => {
                write!(f, "stop {stop} is not assigned to any route")
            }
            ConfigError::InvalidPosition { route, position } => {
                write!(f, "route {route}: position {position} is not 1-indexed")
            }
            ConfigError::NonContiguousPositions {
                route,
                expected,
                found,
            } => write!(
                f,
                "route {route}: expected position {expected}, found {found}"
            ),
            ConfigError::MixedShifts { route } => {
                write!(f, "route {route} mixes day and night stops")
            }
            ConfigError::InvalidServiceTime { stop, value } => {
                write!(f, "stop {stop} has invalid service time {value}")
            }
            ConfigError::UnknownPolicy(s) => write!(f, "unknown improvement policy: {s}"),
            ConfigError::UnknownCompatibility(s) => {
                write!(f, "unknown route compatibility rule: {s}")
            }
            ConfigError::UnknownAcceptance(s) => write!(f, "unknown acceptance strategy: {s}"),
            ConfigError::UnknownNeighborhood(s) => write!(f, "unknown neighborhood: {s}"),
            ConfigError::InvalidParameter { name, reason } => {
                write!(f, "invalid {name}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
