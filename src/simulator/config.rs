use serde::{Deserialize, Serialize};

use super::profile::SpendingProfile;

pub const DEFAULT_MONTHS: u32 = 6;
pub const MIN_MONTHS: u32 = 1;
pub const MAX_MONTHS: u32 = 12;
pub const DEFAULT_EXTRA_RESERVE: f64 = 500.0;
pub const DEFAULT_FX_DELTA_PERCENT: f64 = 15.0;

/// Simulator defaults, overridable per run from the command line.
///
/// Example YAML:
/// ```yaml
/// simulator:
///   months: 6
///   extra_reserve: 500
///   fx_delta_percent: 15
///   profile: realistic
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub months: Option<u32>,

    #[serde(default)]
    pub extra_reserve: Option<f64>,

    #[serde(default)]
    pub fx_delta_percent: Option<f64>,

    #[serde(default)]
    pub profile: Option<SpendingProfile>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            months: Some(DEFAULT_MONTHS),
            extra_reserve: Some(DEFAULT_EXTRA_RESERVE),
            fx_delta_percent: Some(DEFAULT_FX_DELTA_PERCENT),
            profile: Some(SpendingProfile::default()),
        }
    }
}

impl SimulatorConfig {
    pub fn months(&self) -> u32 {
        self.months.unwrap_or(DEFAULT_MONTHS)
    }

    pub fn extra_reserve(&self) -> f64 {
        self.extra_reserve.unwrap_or(DEFAULT_EXTRA_RESERVE)
    }

    pub fn fx_delta_percent(&self) -> f64 {
        self.fx_delta_percent.unwrap_or(DEFAULT_FX_DELTA_PERCENT)
    }

    pub fn profile(&self) -> SpendingProfile {
        self.profile.unwrap_or_default()
    }
}

/// Validate simulator settings, collecting every problem.
pub fn validate_simulator(config: &SimulatorConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(months) = config.months {
        if !(MIN_MONTHS..=MAX_MONTHS).contains(&months) {
            errors.push(format!(
                "simulator.months: must be between {} and {}, got {}",
                MIN_MONTHS, MAX_MONTHS, months
            ));
        }
    }

    if let Some(reserve) = config.extra_reserve {
        if !reserve.is_finite() || reserve < 0.0 {
            errors.push(format!(
                "simulator.extra_reserve: must be non-negative, got {}",
                reserve
            ));
        }
    }

    if let Some(fx) = config.fx_delta_percent {
        if !fx.is_finite() {
            errors.push("simulator.fx_delta_percent: must be a finite number".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.months(), 6);
        assert_eq!(config.extra_reserve(), 500.0);
        assert_eq!(config.fx_delta_percent(), 15.0);
        assert_eq!(config.profile(), SpendingProfile::Realistic);
        assert!(validate_simulator(&config).is_ok());
    }

    #[test]
    fn test_empty_fields_fall_back() {
        let config = SimulatorConfig {
            months: None,
            extra_reserve: None,
            fx_delta_percent: None,
            profile: None,
        };
        assert_eq!(config.months(), DEFAULT_MONTHS);
        assert_eq!(config.profile(), SpendingProfile::Realistic);
    }

    #[test]
    fn test_deserialize_partial() {
        let yaml = "months: 3\nprofile: frugal\n";
        let config: SimulatorConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.months(), 3);
        assert_eq!(config.profile(), SpendingProfile::Frugal);
        assert_eq!(config.extra_reserve(), DEFAULT_EXTRA_RESERVE);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "months: 3\nbudget: 100\n";
        let result: Result<SimulatorConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let config = SimulatorConfig {
            months: Some(13),
            extra_reserve: Some(-1.0),
            fx_delta_percent: Some(f64::NAN),
            profile: None,
        };
        let errors = validate_simulator(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("months"));
        assert!(errors[1].contains("extra_reserve"));
    }

    #[test]
    fn test_zero_months_invalid() {
        let config = SimulatorConfig {
            months: Some(0),
            ..SimulatorConfig::default()
        };
        assert!(validate_simulator(&config).is_err());
    }
}
