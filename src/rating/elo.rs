//! ELO rating system implementation
//!
//! Expected scores use the standard logistic curve. The K-factor is a step
//! function of a player's cumulative hours played, so experienced players
//! move more slowly than newcomers.

use crate::error::LadderError;
use crate::rating::calculator::RatingCalculator;
use serde::{Deserialize, Serialize};

/// One step of the K-factor table: players with fewer than `max_hours`
/// hours played use `k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KFactorTier {
    pub max_hours: f64,
    pub k: f64,
}

/// Configuration for the ELO rating system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EloConfig {
    /// Rating for new players
    pub initial_rating: f64,
    /// Rating difference at which the stronger side is expected to win 10:1
    pub logistic_scale: f64,
    /// Tiers in ascending order of `max_hours`
    pub k_factor_tiers: Vec<KFactorTier>,
    /// K-factor once a player is past every tier
    pub fallback_k: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            initial_rating: 0.0,
            logistic_scale: 400.0,
            k_factor_tiers: vec![
                KFactorTier {
                    max_hours: 500.0,
                    k: 50.0,
                },
                KFactorTier {
                    max_hours: 1000.0,
                    k: 40.0,
                },
                KFactorTier {
                    max_hours: 3000.0,
                    k: 30.0,
                },
                KFactorTier {
                    max_hours: 5000.0,
                    k: 20.0,
                },
            ],
            fallback_k: 10.0,
        }
    }
}

impl EloConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.initial_rating.is_finite() {
            return Err(LadderError::ConfigurationError {
                message: "Initial rating must be finite".to_string(),
            });
        }

        if !(self.logistic_scale > 0.0) {
            return Err(LadderError::ConfigurationError {
                message: "Logistic scale must be positive".to_string(),
            });
        }

        if !(self.fallback_k > 0.0) {
            return Err(LadderError::ConfigurationError {
                message: "Fallback K-factor must be positive".to_string(),
            });
        }

        for tier in &self.k_factor_tiers {
            if !(tier.k > 0.0) {
                return Err(LadderError::ConfigurationError {
                    message: format!("K-factor for tier below {} hours must be positive", tier.max_hours),
                });
            }
        }

        let ascending = self
            .k_factor_tiers
            .windows(2)
            .all(|pair| pair[0].max_hours < pair[1].max_hours);
        if !ascending {
            return Err(LadderError::ConfigurationError {
                message: "K-factor tiers must be sorted by strictly increasing max_hours".to_string(),
            });
        }

        Ok(())
    }
}

/// ELO calculator with an hours-played K-factor table
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    config: EloConfig,
}

impl EloRatingCalculator {
    /// Create a new calculator, rejecting invalid configuration
    pub fn new(config: EloConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Default for EloRatingCalculator {
    fn default() -> Self {
        Self {
            config: EloConfig::default(),
        }
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    fn k_factor(&self, hours_played: f64) -> f64 {
        self.config
            .k_factor_tiers
            .iter()
            .find(|tier| hours_played < tier.max_hours)
            .map(|tier| tier.k)
            .unwrap_or(self.config.fallback_k)
    }

    fn expected_score(&self, rating: f64, opponent_rating: f64) -> f64 {
        1.0 / (1.0 + 10f64.powf((opponent_rating - rating) / self.config.logistic_scale))
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "elo",
            "initial_rating": self.config.initial_rating,
            "logistic_scale": self.config.logistic_scale,
            "k_factor_tiers": self.config.k_factor_tiers,
            "fallback_k": self.config.fallback_k,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_k_factor_table_boundaries() {
        let calc = EloRatingCalculator::default();

        assert_eq!(calc.k_factor(0.0), 50.0);
        assert_eq!(calc.k_factor(499.9), 50.0);
        assert_eq!(calc.k_factor(500.0), 40.0);
        assert_eq!(calc.k_factor(999.0), 40.0);
        assert_eq!(calc.k_factor(1000.0), 30.0);
        assert_eq!(calc.k_factor(2999.0), 30.0);
        assert_eq!(calc.k_factor(3000.0), 20.0);
        assert_eq!(calc.k_factor(4999.0), 20.0);
        assert_eq!(calc.k_factor(5000.0), 10.0);
        assert_eq!(calc.k_factor(100_000.0), 10.0);
    }

    #[test]
    fn test_expected_score_equal_ratings() {
        let calc = EloRatingCalculator::default();
        assert!((calc.expected_score(0.0, 0.0) - 0.5).abs() < 1e-12);
        assert!((calc.expected_score(1500.0, 1500.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_expected_score_400_point_gap() {
        let calc = EloRatingCalculator::default();
        // 400 points ahead means 10:1 odds
        let expected = calc.expected_score(400.0, 0.0);
        assert!((expected - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_updated_rating() {
        let calc = EloRatingCalculator::default();
        assert_eq!(calc.updated_rating(0.0, 50.0, 1.0, 0.5), 25.0);
        assert_eq!(calc.updated_rating(0.0, 50.0, 0.0, 0.5), -25.0);
        assert_eq!(calc.updated_rating(10.0, 50.0, 0.5, 0.5), 10.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(EloConfig::default().validate().is_ok());

        let mut config = EloConfig::default();
        config.logistic_scale = 0.0;
        assert!(EloRatingCalculator::new(config).is_err());

        let mut config = EloConfig::default();
        config.k_factor_tiers.reverse();
        assert!(config.validate().is_err());

        let mut config = EloConfig::default();
        config.fallback_k = -1.0;
        assert!(config.validate().is_err());

        let mut config = EloConfig::default();
        config.k_factor_tiers[0].k = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_tiers() {
        let calc = EloRatingCalculator::new(EloConfig {
            k_factor_tiers: vec![KFactorTier {
                max_hours: 10.0,
                k: 32.0,
            }],
            fallback_k: 16.0,
            ..EloConfig::default()
        })
        .unwrap();

        assert_eq!(calc.k_factor(9.0), 32.0);
        assert_eq!(calc.k_factor(10.0), 16.0);
    }

    proptest! {
        #[test]
        fn expected_scores_sum_to_one(r1 in -3000.0f64..3000.0, r2 in -3000.0f64..3000.0) {
            let calc = EloRatingCalculator::default();
            let total = calc.expected_score(r1, r2) + calc.expected_score(r2, r1);
            prop_assert!((total - 1.0).abs() < 1e-9);
        }

        #[test]
        fn higher_rating_is_favoured(r1 in -3000.0f64..3000.0, gap in 1.0f64..1000.0) {
            let calc = EloRatingCalculator::default();
            prop_assert!(calc.expected_score(r1 + gap, r1) > 0.5);
        }

        #[test]
        fn equal_k_update_is_zero_sum(r1 in -3000.0f64..3000.0, r2 in -3000.0f64..3000.0, hours in 0.0f64..10_000.0) {
            let calc = EloRatingCalculator::default();
            let k = calc.k_factor(hours);
            let e1 = calc.expected_score(r1, r2);
            let e2 = calc.expected_score(r2, r1);
            let d1 = calc.updated_rating(r1, k, 1.0, e1) - r1;
            let d2 = calc.updated_rating(r2, k, 0.0, e2) - r2;
            prop_assert!((d1 + d2).abs() < 1e-9);
        }
    }
}
