//! Checks performed around the engine: covariate plausibility, renal
//! function thresholds and dose limits.

use serde::{Deserialize, Serialize};
use log::warn;
use crate::config::units::inches_to_cm;
use crate::dosing::targets::{Bounds, ACCEPTABLE_AUC, SUGGESTED_AUC, TARGET_TROUGH};
use crate::error::{VancoError, VancoResult};
use crate::patient::PatientCovariates;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyLimits {
    pub age: Bounds,
    pub weight_kg: Bounds,
    pub height_cm: Bounds,
    pub creatinine_mg_dl: Bounds,
    pub min_dose_mg: f64,
    pub max_single_dose_mg: f64,
    pub target_auc: Bounds,
    pub suggested_auc: Bounds,
    pub target_trough: Bounds,
    pub crcl_warning: f64,
    pub crcl_critical: f64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            age: Bounds::new(18.0, 120.0),
            weight_kg: Bounds::new(20.0, 300.0),
            height_cm: Bounds::new(120.0, 250.0),
            creatinine_mg_dl: Bounds::new(0.2, 15.0),
            min_dose_mg: 500.0,
            max_single_dose_mg: 3000.0,
            target_auc: ACCEPTABLE_AUC,
            suggested_auc: SUGGESTED_AUC,
            target_trough: TARGET_TROUGH,
            crcl_warning: 30.0,
            crcl_critical: 15.0,
        }
    }
}

impl SafetyLimits {
    pub fn validate(&self) -> VancoResult<()> {
        let bands = [
            ("age", &self.age),
            ("weight", &self.weight_kg),
            ("height", &self.height_cm),
            ("creatinine", &self.creatinine_mg_dl),
            ("target AUC", &self.target_auc),
            ("suggested AUC", &self.suggested_auc),
            ("target trough", &self.target_trough),
        ];
        for (name, band) in bands {
            if !(band.min <= band.max) {
                return Err(VancoError::InvalidInput(format!(
                    "Limit range for {} is empty ({})",
                    name, band
                )));
            }
        }

        if self.min_dose_mg > self.max_single_dose_mg {
            return Err(VancoError::InvalidInput(
                "Minimum dose exceeds maximum single dose".to_string()
            ));
        }
        if self.crcl_critical > self.crcl_warning {
            return Err(VancoError::InvalidInput(
                "Critical CrCl threshold must not exceed the warning threshold".to_string()
            ));
        }
        Ok(())
    }
}

/// Rejects covariates outside the clinically plausible ranges.
pub fn validate_covariates(covariates: &PatientCovariates, limits: &SafetyLimits) -> VancoResult<()> {
    let height_cm = inches_to_cm(covariates.height_in);
    let checks = [
        ("Age", covariates.age_years, &limits.age, "years"),
        ("Weight", covariates.weight_kg, &limits.weight_kg, "kg"),
        ("Height", height_cm, &limits.height_cm, "cm"),
        ("Creatinine", covariates.creatinine_mg_dl, &limits.creatinine_mg_dl, "mg/dL"),
    ];

    for (name, value, band, unit) in checks {
        if !band.contains(value) {
            return Err(VancoError::InvalidInput(format!(
                "{} {:.1} {} is outside {} {}",
                name, value, unit, band, unit
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenalStatus {
    Adequate,
    /// Below the warning threshold; dose reduction required.
    Reduced,
    /// Below the critical threshold; dosing is blocked.
    Critical,
}

pub fn renal_status(crcl: f64, limits: &SafetyLimits) -> RenalStatus {
    if crcl < limits.crcl_critical {
        RenalStatus::Critical
    } else if crcl < limits.crcl_warning {
        RenalStatus::Reduced
    } else {
        RenalStatus::Adequate
    }
}

/// Like [`renal_status`] but fails when dosing must not proceed.
pub fn check_renal_function(crcl: f64, limits: &SafetyLimits) -> VancoResult<RenalStatus> {
    match renal_status(crcl, limits) {
        RenalStatus::Critical => Err(VancoError::RenalFunction {
            crcl,
            threshold: limits.crcl_critical,
        }),
        RenalStatus::Reduced => {
            warn!(
                "CrCl {:.1} mL/min is below {} mL/min; dose reduction required",
                crcl, limits.crcl_warning
            );
            Ok(RenalStatus::Reduced)
        }
        status => Ok(status),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseLimitCheck {
    WithinLimits,
    BelowMinimum,
    AboveMaximum,
}

pub fn check_dose_limits(dose_mg: f64, limits: &SafetyLimits) -> DoseLimitCheck {
    if dose_mg < limits.min_dose_mg {
        DoseLimitCheck::BelowMinimum
    } else if dose_mg > limits.max_single_dose_mg {
        DoseLimitCheck::AboveMaximum
    } else {
        DoseLimitCheck::WithinLimits
    }
}
