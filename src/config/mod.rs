#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_ordered_pair, validate_positive_number, validate_unit_interval, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters for one allocation run.
///
/// Every field is overridable from a TOML file; defaults match the values the
/// scoring model was calibrated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub max_team_size: usize,
    pub max_leaders_per_team: usize,
    pub min_category_score_threshold: f64,
    pub min_timezone_score_threshold: f64,
    pub perfect_match_threshold: f64,
    pub perfect_match_bonus: f64,
    pub mid_match_threshold_low: f64,
    pub mid_match_threshold_high: f64,
    pub mid_match_bonus_increment: f64,
    pub mid_match_bonus_cap: f64,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            max_team_size: 12,
            max_leaders_per_team: 2,
            min_category_score_threshold: 0.1,
            min_timezone_score_threshold: 0.55,
            perfect_match_threshold: 0.95,
            perfect_match_bonus: 0.25,
            mid_match_threshold_low: 0.4,
            mid_match_threshold_high: 0.6,
            mid_match_bonus_increment: 0.01,
            mid_match_bonus_cap: 0.05,
        }
    }
}

impl FormationConfig {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FormationConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for FormationConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("max_team_size", self.max_team_size, 1)?;
        validate_positive_number("max_leaders_per_team", self.max_leaders_per_team, 1)?;
        validate_unit_interval(
            "min_category_score_threshold",
            self.min_category_score_threshold,
        )?;
        validate_unit_interval(
            "min_timezone_score_threshold",
            self.min_timezone_score_threshold,
        )?;
        validate_unit_interval("perfect_match_threshold", self.perfect_match_threshold)?;
        validate_unit_interval("perfect_match_bonus", self.perfect_match_bonus)?;
        validate_unit_interval("mid_match_threshold_low", self.mid_match_threshold_low)?;
        validate_unit_interval("mid_match_threshold_high", self.mid_match_threshold_high)?;
        validate_unit_interval("mid_match_bonus_increment", self.mid_match_bonus_increment)?;
        validate_unit_interval("mid_match_bonus_cap", self.mid_match_bonus_cap)?;
        validate_ordered_pair(
            "mid_match_threshold_low",
            self.mid_match_threshold_low,
            "mid_match_threshold_high",
            self.mid_match_threshold_high,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FormationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_team_size() {
        let config = FormationConfig {
            max_team_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let config = FormationConfig {
            min_timezone_score_threshold: 1.3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_mid_band() {
        let config = FormationConfig {
            mid_match_threshold_low: 0.8,
            mid_match_threshold_high: 0.6,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_file_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formation.toml");
        std::fs::write(&path, "max_team_size = 6\nmin_category_score_threshold = 0.2\n")
            .unwrap();

        let config = FormationConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.max_team_size, 6);
        assert_eq!(config.min_category_score_threshold, 0.2);
        // Untouched fields keep their defaults.
        assert_eq!(config.max_leaders_per_team, 2);
    }
}
