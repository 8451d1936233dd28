//! Variable Neighborhood Descent configuration.

use crate::acceptance::AcceptanceConfig;
use crate::compatibility::CompatibilityRule;
use crate::error::ConfigError;
use crate::local_search::{validate_epsilon, ImprovementPolicy, LocalSearchConfig};
use crate::models::MoveKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default shift cap: seven hours, in minutes.
pub const DEFAULT_MAX_SHIFT_DURATION: f64 = 420.0;

/// One entry of the descent order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodConfig {
    /// Neighborhood to run.
    pub kind: MoveKind,
    /// Scans per descent pass; `None` runs to a local optimum.
    pub max_iterations: Option<usize>,
    /// Candidate selection policy.
    pub policy: ImprovementPolicy,
}

impl NeighborhoodConfig {
    /// One best-improvement scan per pass.
    pub fn new(kind: MoveKind) -> Self {
        Self {
            kind,
            max_iterations: Some(1),
            policy: ImprovementPolicy::Best,
        }
    }

    /// Sets the scan cap; `None` removes it.
    pub fn with_max_iterations(mut self, n: Option<usize>) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the improvement policy.
    pub fn with_policy(mut self, policy: ImprovementPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl From<MoveKind> for NeighborhoodConfig {
    fn from(kind: MoveKind) -> Self {
        Self::new(kind)
    }
}

/// Configuration of a descent run.
///
/// # Examples
///
/// ```
/// use route_vnd::acceptance::AcceptanceConfig;
/// use route_vnd::models::MoveKind;
/// use route_vnd::vnd::VndConfig;
/// use std::time::Duration;
///
/// let config = VndConfig::default()
///     .with_max_shift_duration(480.0)
///     .with_acceptance("sa:5:1".parse().unwrap())
///     .with_time_limit(Duration::from_secs(60));
/// assert_eq!(config.neighborhoods.len(), 6);
/// assert_eq!(config.neighborhoods[0].kind, MoveKind::IntraShift);
/// assert!(config.validate().is_ok());
///
/// let config = config.with_neighborhoods([MoveKind::Intra2Opt, MoveKind::InterShift]);
/// assert_eq!(config.neighborhoods.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VndConfig {
    /// Neighborhoods in priority order.
    pub neighborhoods: Vec<NeighborhoodConfig>,
    /// Shift cap in minutes.
    pub max_shift_duration: f64,
    /// Route pairs eligible for inter-route moves.
    pub compatibility: CompatibilityRule,
    /// Move acceptance strategy.
    pub acceptance: AcceptanceConfig,
    /// Wall-clock budget, checked between neighborhood passes.
    pub time_limit: Option<Duration>,
    /// Minimum improvement (minutes) for a move or pass to count.
    pub epsilon: f64,
}

impl Default for VndConfig {
    fn default() -> Self {
        Self {
            neighborhoods: MoveKind::ALL.into_iter().map(NeighborhoodConfig::new).collect(),
            max_shift_duration: DEFAULT_MAX_SHIFT_DURATION,
            compatibility: CompatibilityRule::SameShift,
            acceptance: AcceptanceConfig::Greedy,
            time_limit: None,
            epsilon: 1e-6,
        }
    }
}

impl VndConfig {
    /// Replaces the descent order.
    pub fn with_neighborhoods<I, N>(mut self, neighborhoods: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<NeighborhoodConfig>,
    {
        self.neighborhoods = neighborhoods.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the shift cap in minutes.
    pub fn with_max_shift_duration(mut self, minutes: f64) -> Self {
        self.max_shift_duration = minutes;
        self
    }

    /// Sets the compatibility rule.
    pub fn with_compatibility(mut self, rule: CompatibilityRule) -> Self {
        self.compatibility = rule;
        self
    }

    /// Sets the acceptance strategy.
    pub fn with_acceptance(mut self, acceptance: AcceptanceConfig) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the improvement threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Validates parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.neighborhoods.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "neighborhoods",
                reason: "at least one neighborhood is required".into(),
            });
        }
        if !(self.max_shift_duration > 0.0 && self.max_shift_duration.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "max_shift_duration",
                reason: format!(
                    "must be positive and finite, got {}",
                    self.max_shift_duration
                ),
            });
        }
        validate_epsilon(self.epsilon)?;
        self.acceptance.validate()
    }

    /// Driver settings for one entry of the descent order.
    pub fn local_search(&self, neighborhood: &NeighborhoodConfig) -> LocalSearchConfig {
        LocalSearchConfig {
            max_iterations: neighborhood.max_iterations,
            policy: neighborhood.policy,
            epsilon: self.epsilon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let config = VndConfig::default();
        let kinds: Vec<MoveKind> = config.neighborhoods.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, MoveKind::ALL.to_vec());
        assert!(config
            .neighborhoods
            .iter()
            .all(|n| n.max_iterations == Some(1) && n.policy == ImprovementPolicy::Best));
        assert!((config.max_shift_duration - 420.0).abs() < 1e-10);
        assert_eq!(config.time_limit, None);
    }

    #[test]
    fn test_validate() {
        assert!(VndConfig::default().validate().is_ok());
        let empty = VndConfig::default().with_neighborhoods(Vec::<MoveKind>::new());
        assert!(matches!(
            empty.validate(),
            Err(ConfigError::InvalidParameter { name: "neighborhoods", .. })
        ));
        assert!(VndConfig::default()
            .with_max_shift_duration(0.0)
            .validate()
            .is_err());
        assert!(VndConfig::default().with_epsilon(f64::NAN).validate().is_err());
        let cold = AcceptanceConfig::SimulatedAnnealing {
            temperature: -1.0,
            seed: None,
        };
        assert!(VndConfig::default().with_acceptance(cold).validate().is_err());
    }

    #[test]
    fn test_local_search_settings() {
        let config = VndConfig::default().with_epsilon(1e-3);
        let nb = NeighborhoodConfig::new(MoveKind::InterSwap)
            .with_max_iterations(None)
            .with_policy(ImprovementPolicy::First);
        let ls = config.local_search(&nb);
        assert_eq!(ls.max_iterations, None);
        assert_eq!(ls.policy, ImprovementPolicy::First);
        assert!((ls.epsilon - 1e-3).abs() < 1e-15);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = VndConfig::default()
            .with_compatibility(CompatibilityRule::Any)
            .with_time_limit(Duration::from_millis(1500));
        let json = serde_json::to_string(&config).expect("serialize");
        let back: VndConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }
}
