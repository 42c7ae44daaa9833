pub mod units;

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::dosing::{DosingFrequency, STANDARD_INFUSION_HOURS};
use crate::error::{VancoError, VancoResult};
use crate::patient::{PatientCovariates, Sex};
use crate::safety::SafetyLimits;
use self::units::{CreatinineUnit, HeightUnit, WeightUnit};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub patient: PatientConfig,
    pub dosing: DosingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub limits: SafetyLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientConfig {
    pub sex: Sex,
    pub age: f64,
    pub height: f64,
    #[serde(default)]
    pub height_unit: HeightUnit,
    pub weight: f64,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    pub creatinine: f64,
    #[serde(default)]
    pub creatinine_unit: CreatinineUnit,
}

impl PatientConfig {
    /// Normalises to the engine units: inches, kg and mg/dL.
    pub fn to_covariates(&self) -> PatientCovariates {
        PatientCovariates {
            sex: self.sex,
            age_years: self.age,
            height_in: self.height_unit.to_inches(self.height),
            weight_kg: self.weight_unit.to_kg(self.weight),
            creatinine_mg_dl: self.creatinine_unit.to_mg_dl(self.creatinine),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosingConfig {
    pub frequency: DosingFrequency,
    /// Explicit dose (mg) overriding the suggested candidate.
    #[serde(default)]
    pub dose: Option<f64>,
    #[serde(default = "default_infusion_hours")]
    pub infusion_hours: f64,
}

fn default_infusion_hours() -> f64 {
    STANDARD_INFUSION_HOURS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub time_points: Vec<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_points: (0..=6).map(|i| i as f64 * 10.0).collect(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> VancoResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> VancoResult<()> {
        self.limits.validate()?;
        self.validate_dosing()?;

        if self.simulation.time_points.is_empty() {
            return Err(VancoError::InvalidInput(
                "At least one time point must be specified".to_string()
            ));
        }

        if self.simulation.time_points.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(VancoError::InvalidInput(
                "Time points must be finite and non-negative".to_string()
            ));
        }

        Ok(())
    }

    fn validate_dosing(&self) -> VancoResult<()> {
        let infusion = self.dosing.infusion_hours;
        if !infusion.is_finite() || infusion <= 0.0 {
            return Err(VancoError::InvalidDosing(
                "Infusion duration must be positive".to_string()
            ));
        }

        let tau = self.dosing.frequency.hours();
        if infusion > tau {
            return Err(VancoError::InvalidDosing(format!(
                "Infusion duration {} h exceeds the dosing interval of {} h",
                infusion, tau
            )));
        }

        if let Some(dose) = self.dosing.dose {
            if !dose.is_finite() || dose <= 0.0 {
                return Err(VancoError::InvalidDosing(
                    "Dose amount must be positive".to_string()
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: &str = r#"{
        "patient": {
            "sex": "female",
            "age": 50,
            "height": 162.56,
            "height_unit": "cm",
            "weight": 60,
            "creatinine": 0.8
        },
        "dosing": { "frequency": 24 }
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let config: Config = serde_json::from_str(SAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.dosing.frequency, DosingFrequency::Q24h);
        assert_eq!(config.dosing.dose, None);
        assert_relative_eq!(config.dosing.infusion_hours, 1.0);
        assert_eq!(config.simulation.time_points, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);

        let covariates = config.patient.to_covariates();
        assert_eq!(covariates.sex, Sex::Female);
        assert_relative_eq!(covariates.height_in, 64.0, epsilon = 1e-9);
        assert_relative_eq!(covariates.weight_kg, 60.0);
    }

    #[test]
    fn test_unsupported_frequency_rejected() {
        let json = SAMPLE.replace("\"frequency\": 24", "\"frequency\": 8");
        assert!(serde_json::from_str::<Config>(&json).is_err());
    }

    #[test]
    fn test_infusion_longer_than_interval_rejected() {
        let mut config: Config = serde_json::from_str(SAMPLE).unwrap();
        config.dosing.infusion_hours = 30.0;
        assert!(matches!(config.validate(), Err(VancoError::InvalidDosing(_))));
    }

    #[test]
    fn test_non_positive_dose_rejected() {
        let mut config: Config = serde_json::from_str(SAMPLE).unwrap();
        config.dosing.dose = Some(0.0);
        assert!(matches!(config.validate(), Err(VancoError::InvalidDosing(_))));
    }

    #[test]
    fn test_empty_time_points_rejected() {
        let mut config: Config = serde_json::from_str(SAMPLE).unwrap();
        config.simulation.time_points.clear();
        assert!(matches!(config.validate(), Err(VancoError::InvalidInput(_))));
    }
}
