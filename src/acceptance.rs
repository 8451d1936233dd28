//! Acceptance strategies for candidate moves.
//!
//! A strategy sees only `(delta, current_objective, new_objective)`, where
//! `delta = current_objective - new_objective` (positive = improvement). It
//! knows nothing about neighborhoods or solutions.

use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seed used when an annealing configuration does not name one.
const DEFAULT_SEED: u64 = 42;

/// Decides whether a feasible candidate move may be taken.
pub trait Acceptance {
    /// Returns `true` to accept a move with the given improvement.
    fn accept(&mut self, delta: f64, current_objective: f64, new_objective: f64) -> bool;
}

/// Accepts strictly improving moves only.
///
/// # Examples
///
/// ```
/// use route_vnd::acceptance::{Acceptance, Greedy};
///
/// let mut greedy = Greedy;
/// assert!(greedy.accept(1.5, 100.0, 98.5));
/// assert!(!greedy.accept(0.0, 100.0, 100.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Greedy;

impl Acceptance for Greedy {
    fn accept(&mut self, delta: f64, _current_objective: f64, _new_objective: f64) -> bool {
        delta > 0.0
    }
}

/// Metropolis criterion at a fixed temperature.
///
/// Improving moves are always accepted; others with probability
/// `exp(delta / temperature)`. There is no built-in cooling: use
/// [`SimulatedAnnealing::cooled`] to obtain a colder instance between passes.
///
/// # Examples
///
/// ```
/// use route_vnd::acceptance::{Acceptance, SimulatedAnnealing};
///
/// let mut sa = SimulatedAnnealing::new(10.0, 7).unwrap();
/// assert!(sa.accept(0.5, 100.0, 99.5));
/// let colder = sa.cooled(0.5).unwrap();
/// assert!((colder.temperature() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    temperature: f64,
    rng: StdRng,
}

impl SimulatedAnnealing {
    /// Creates an annealing criterion with its own seeded generator.
    pub fn new(temperature: f64, seed: u64) -> Result<Self, ConfigError> {
        validate_temperature(temperature)?;
        Ok(Self {
            temperature,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns a new criterion at `temperature * rate`, seeded from this
    /// instance's generator.
    pub fn cooled(&mut self, rate: f64) -> Result<Self, ConfigError> {
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "cooling rate",
                reason: format!("must be positive and finite, got {rate}"),
            });
        }
        let seed = self.rng.random::<u64>();
        Self::new(self.temperature * rate, seed)
    }
}

impl Acceptance for SimulatedAnnealing {
    fn accept(&mut self, delta: f64, _current_objective: f64, _new_objective: f64) -> bool {
        if delta > 0.0 {
            return true;
        }
        let probability = (delta / self.temperature).exp();
        self.rng.random_range(0.0..1.0) < probability
    }
}

impl<A: Acceptance + ?Sized> Acceptance for Box<A> {
    fn accept(&mut self, delta: f64, current_objective: f64, new_objective: f64) -> bool {
        (**self).accept(delta, current_objective, new_objective)
    }
}

fn validate_temperature(temperature: f64) -> Result<(), ConfigError> {
    if temperature > 0.0 && temperature.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name: "temperature",
            reason: format!("must be positive and finite, got {temperature}"),
        })
    }
}

/// Serializable description of an acceptance strategy.
///
/// Parses from `"greedy"` or `"sa:<temperature>[:<seed>]"`.
///
/// # Examples
///
/// ```
/// use route_vnd::acceptance::AcceptanceConfig;
///
/// let cfg: AcceptanceConfig = "sa:2.5:11".parse().unwrap();
/// assert_eq!(
///     cfg,
///     AcceptanceConfig::SimulatedAnnealing { temperature: 2.5, seed: Some(11) }
/// );
/// assert!("metropolis".parse::<AcceptanceConfig>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AcceptanceConfig {
    /// [`Greedy`].
    #[default]
    Greedy,
    /// [`SimulatedAnnealing`] at a fixed temperature.
    SimulatedAnnealing {
        /// Temperature (must be positive).
        temperature: f64,
        /// Generator seed; a fixed default when absent.
        seed: Option<u64>,
    },
}

impl AcceptanceConfig {
    /// Validates parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            AcceptanceConfig::Greedy => Ok(()),
            AcceptanceConfig::SimulatedAnnealing { temperature, .. } => {
                validate_temperature(temperature)
            }
        }
    }

    /// Instantiates the strategy.
    pub fn build(&self) -> Result<Box<dyn Acceptance>, ConfigError> {
        match *self {
            AcceptanceConfig::Greedy => Ok(Box::new(Greedy)),
            AcceptanceConfig::SimulatedAnnealing { temperature, seed } => Ok(Box::new(
                SimulatedAnnealing::new(temperature, seed.unwrap_or(DEFAULT_SEED))?,
            )),
        }
    }
}

impl fmt::Display for AcceptanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptanceConfig::Greedy => f.write_str("greedy"),
            AcceptanceConfig::SimulatedAnnealing {
                temperature,
                seed: Some(seed),
            } => write!(f, "sa:{temperature}:{seed}"),
            AcceptanceConfig::SimulatedAnnealing {
                temperature,
                seed: None,
            } => write!(f, "sa:{temperature}"),
        }
    }
}

impl FromStr for AcceptanceConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigError::UnknownAcceptance(s.to_string());
        let lowered = s.trim().to_ascii_lowercase();
        let mut parts = lowered.split(':');
        match parts.next() {
            Some("greedy") if parts.next().is_none() => Ok(AcceptanceConfig::Greedy),
            Some("sa" | "simulated_annealing") => {
                let temperature = parts
                    .next()
                    .and_then(|t| t.parse::<f64>().ok())
                    .ok_or_else(unknown)?;
                let seed = match parts.next() {
                    Some(seed) => Some(seed.parse::<u64>().map_err(|_| unknown())?),
                    None => None,
                };
                if parts.next().is_some() {
                    return Err(unknown());
                }
                let cfg = AcceptanceConfig::SimulatedAnnealing { temperature, seed };
                cfg.validate()?;
                Ok(cfg)
            }
            _ => Err(unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy() {
        let mut g = Greedy;
        assert!(g.accept(1e-3, 10.0, 10.0 - 1e-3));
        assert!(!g.accept(0.0, 10.0, 10.0));
        assert!(!g.accept(-2.0, 10.0, 12.0));
    }

    #[test]
    fn test_sa_always_accepts_improvement() {
        let mut sa = SimulatedAnnealing::new(0.001, 1).expect("valid");
        for _ in 0..100 {
            assert!(sa.accept(0.1, 10.0, 9.9));
        }
    }

    #[test]
    fn test_sa_cold_rejects_large_worsening() {
        let mut sa = SimulatedAnnealing::new(0.01, 3).expect("valid");
        // exp(-100 / 0.01) underflows to zero
        assert!((0..100).all(|_| !sa.accept(-100.0, 10.0, 110.0)));
    }

    #[test]
    fn test_sa_hot_accepts_most_worsening() {
        let mut sa = SimulatedAnnealing::new(1e6, 5).expect("valid");
        let accepted = (0..1000).filter(|_| sa.accept(-1.0, 10.0, 11.0)).count();
        assert!(accepted > 990, "accepted {accepted}");
    }

    #[test]
    fn test_sa_is_reproducible() {
        let mut a = SimulatedAnnealing::new(1.0, 99).expect("valid");
        let mut b = SimulatedAnnealing::new(1.0, 99).expect("valid");
        let da: Vec<bool> = (0..50).map(|_| a.accept(-0.7, 0.0, 0.7)).collect();
        let db: Vec<bool> = (0..50).map(|_| b.accept(-0.7, 0.0, 0.7)).collect();
        assert_eq!(da, db);
    }

    #[test]
    fn test_sa_rejects_bad_temperature() {
        assert!(SimulatedAnnealing::new(0.0, 1).is_err());
        assert!(SimulatedAnnealing::new(f64::NAN, 1).is_err());
        let mut sa = SimulatedAnnealing::new(1.0, 1).expect("valid");
        assert!(sa.cooled(-0.5).is_err());
    }

    #[test]
    fn test_config_parse_and_display() {
        assert_eq!("greedy".parse(), Ok(AcceptanceConfig::Greedy));
        let cfg: AcceptanceConfig = "SA:3".parse().expect("valid");
        assert_eq!(
            cfg,
            AcceptanceConfig::SimulatedAnnealing {
                temperature: 3.0,
                seed: None
            }
        );
        assert_eq!(cfg.to_string(), "sa:3");
        assert!("sa".parse::<AcceptanceConfig>().is_err());
        assert!("sa:-1".parse::<AcceptanceConfig>().is_err());
        assert!("greedy:1".parse::<AcceptanceConfig>().is_err());
    }

    #[test]
    fn test_config_build() {
        let mut g = AcceptanceConfig::Greedy.build().expect("valid");
        assert!(!g.accept(-1.0, 0.0, 1.0));
        let bad = AcceptanceConfig::SimulatedAnnealing {
            temperature: 0.0,
            seed: None,
        };
        assert!(bad.build().is_err());
    }
}
