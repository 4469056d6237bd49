/// Estimator configuration.
///
/// The host hands over TOML text; this crate never touches the filesystem.
/// Every field is optional and falls back to a compiled default.

use serde::{Deserialize, Serialize};

use crate::amcm::{AmcmInput, Difficulty};
use crate::calibration::{DEFAULT_CURRENCY_CODE, DEFAULT_CURRENCY_RATE, MASS_BALANCE_TOLERANCE};
use crate::errors::ConfigError;
use crate::inflation::{Escalation, InflationIndex};
use crate::units::{Mass, MassUnit};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Year the historical costs are expressed in. Default: 1999, else 2024, else earliest.
    pub base_year: Option<i32>,
    /// Year to escalate to. Default: 2025, else latest.
    pub target_year: Option<i32>,
    /// Unit for entered masses. Default: lbs.
    pub mass_unit: MassUnit,
    /// Allowed mass-balance gap. Default: 1e-3.
    pub mass_tolerance: Option<f64>,
    pub currency: CurrencyConfig,
    pub amcm: AmcmConfig,
}

/// Secondary currency for adjusted estimates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurrencyConfig {
    pub code: String,
    /// Units of this currency per US dollar
    pub rate_per_usd: f64,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: DEFAULT_CURRENCY_CODE.to_string(),
            rate_per_usd: DEFAULT_CURRENCY_RATE,
        }
    }
}

/// AMCM inputs as entered. Unset fields take the form defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AmcmConfig {
    pub quantity: Option<u32>,
    /// Dry mass in `EstimatorConfig::mass_unit`
    pub dry_mass: Option<f64>,
    pub mission_type: Option<usize>,
    pub ioc_year: Option<i32>,
    pub block: Option<u32>,
    /// Ordinal 0..=4, 2 is average
    pub difficulty: Option<usize>,
}

impl EstimatorConfig {
    /// Parse and sanity-check a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.effective_mass_tolerance();
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "mass_tolerance",
                message: format!("{tolerance} is not a non-negative number"),
            });
        }
        let rate = self.currency.rate_per_usd;
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "currency.rate_per_usd",
                message: format!("{rate} is not a positive number"),
            });
        }
        Ok(())
    }

    pub fn effective_mass_tolerance(&self) -> f64 {
        self.mass_tolerance.unwrap_or(MASS_BALANCE_TOLERANCE)
    }

    /// Check that explicit years exist in `index`. Run this where years are
    /// entered; analysis itself tolerates a missing year.
    pub fn validate_years(&self, index: &InflationIndex) -> Result<(), ConfigError> {
        for (role, year) in [("base", self.base_year), ("target", self.target_year)] {
            match year {
                Some(year) if !index.contains(year) => return Err(ConfigError::UnknownYear { role, year }),
                _ => {}
            }
        }
        Ok(())
    }

    /// Base/target pair: explicit years as given, unset years from the
    /// index defaults.
    pub fn escalation_years(&self, index: &InflationIndex) -> Result<(i32, i32), ConfigError> {
        let base_year = self.base_year.or_else(|| index.default_base_year()).ok_or(ConfigError::NoYears)?;
        let target_year = self
            .target_year
            .or_else(|| index.default_target_year())
            .ok_or(ConfigError::NoYears)?;
        Ok((base_year, target_year))
    }

    /// Escalation against `index`. A year missing from the index gives the
    /// neutral factor with `resolved = false`.
    pub fn escalation(&self, index: &InflationIndex) -> Result<Escalation, ConfigError> {
        let (base_year, target_year) = self.escalation_years(index)?;
        Ok(index.escalation(base_year, target_year))
    }

    /// Build the AMCM input from the configured values.
    pub fn amcm_input(&self) -> Result<AmcmInput, ConfigError> {
        let defaults = AmcmInput::default();
        let amcm = &self.amcm;
        let difficulty = match amcm.difficulty {
            Some(i) => Difficulty::from_index(i).ok_or_else(|| ConfigError::InvalidValue {
                field: "amcm.difficulty",
                message: format!("{i} is outside 0..=4"),
            })?,
            None => defaults.difficulty,
        };
        let mass = match amcm.dry_mass {
            Some(value) => Mass::new(value, self.mass_unit),
            None => defaults.mass,
        };
        Ok(AmcmInput {
            quantity: amcm.quantity.unwrap_or(defaults.quantity),
            mass,
            mission_type: amcm.mission_type.unwrap_or(defaults.mission_type),
            ioc_year: amcm.ioc_year.unwrap_or(defaults.ioc_year),
            block: amcm.block.unwrap_or(defaults.block),
            difficulty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.effective_mass_tolerance(), 1e-3);
        assert_eq!(config.mass_unit, MassUnit::Pounds);
        assert_eq!(config.currency.code, "EUR");
        assert_eq!(config.currency.rate_per_usd, 0.86);
    }

    #[test]
    fn test_from_toml() {
        let config = EstimatorConfig::from_toml_str(
            r#"
            base_year = 2000
            target_year = 2024
            mass_unit = "kg"

            [currency]
            code = "GBP"
            rate_per_usd = 0.79

            [amcm]
            quantity = 3
            dry_mass = 250.0
            mission_type = 3
            difficulty = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.base_year, Some(2000));
        assert_eq!(config.mass_unit, MassUnit::Kilograms);
        assert_eq!(config.currency.code, "GBP");

        let input = config.amcm_input().unwrap();
        assert_eq!(input.quantity, 3);
        assert_eq!(input.mass, Mass::kilograms(250.0));
        assert_eq!(input.difficulty, Difficulty::VeryHigh);
        assert_eq!(input.ioc_year, 2025);
        assert_eq!(input.block, 1);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = EstimatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, EstimatorConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = EstimatorConfig::from_toml_str("base_year = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = EstimatorConfig::from_toml_str("[currency]\nrate_per_usd = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "currency.rate_per_usd", .. }));

        let err = EstimatorConfig::from_toml_str("mass_tolerance = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "mass_tolerance", .. }));
    }

    #[test]
    fn test_escalation_years() {
        let index = InflationIndex::fallback();
        let esc = EstimatorConfig::default().escalation(&index).unwrap();
        assert_eq!((esc.base_year, esc.target_year), (1999, 2025));
        assert!((esc.factor - 1.906).abs() < 1e-12);

        let config = EstimatorConfig {
            base_year: Some(2010),
            target_year: Some(2020),
            ..Default::default()
        };
        let esc = config.escalation(&index).unwrap();
        assert!((esc.factor - 1.666 / 1.384).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_year_rejected_at_entry() {
        let index = InflationIndex::fallback();
        let config = EstimatorConfig {
            target_year: Some(2031),
            ..Default::default()
        };
        assert_eq!(
            config.validate_years(&index),
            Err(ConfigError::UnknownYear { role: "target", year: 2031 })
        );
        assert_eq!(EstimatorConfig::default().validate_years(&index), Ok(()));
    }

    #[test]
    fn test_unknown_year_escalates_neutrally() {
        let index = InflationIndex::fallback();
        let config = EstimatorConfig {
            base_year: Some(2000),
            target_year: Some(2031),
            ..Default::default()
        };
        let esc = config.escalation(&index).unwrap();
        assert_eq!((esc.base_year, esc.target_year), (2000, 2031));
        assert_eq!(esc.factor, 1.0);
        assert!(!esc.resolved);
    }

    #[test]
    fn test_empty_index_has_no_default_years() {
        assert_eq!(
            EstimatorConfig::default().escalation(&InflationIndex::default()),
            Err(ConfigError::NoYears)
        );
        let config = EstimatorConfig {
            base_year: Some(1999),
            target_year: Some(2025),
            ..Default::default()
        };
        assert!(!config.escalation(&InflationIndex::default()).unwrap().resolved);
    }

    #[test]
    fn test_bad_difficulty() {
        let config = EstimatorConfig {
            amcm: AmcmConfig {
                difficulty: Some(7),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.amcm_input(),
            Err(ConfigError::InvalidValue { field: "amcm.difficulty", .. })
        ));
    }
}
