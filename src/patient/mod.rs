//! Body-size and renal-function quantities derived from patient covariates.
//!
//! All computations are pure. Range checking of covariates belongs to the
//! caller (see [`crate::safety::validate_covariates`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Total body weight above this multiple of IBW triggers the adjusted weight.
pub const OBESITY_THRESHOLD: f64 = 1.2;
pub const ADJUSTMENT_FACTOR: f64 = 0.4;
pub const FEMALE_CRCL_FACTOR: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Devine base weight (kg) at 60 inches.
    pub fn base_weight(self) -> f64 {
        match self {
            Sex::Male => 50.0,
            Sex::Female => 45.5,
        }
    }

    fn crcl_factor(self) -> f64 {
        match self {
            Sex::Male => 1.0,
            Sex::Female => FEMALE_CRCL_FACTOR,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "Male"),
            Sex::Female => write!(f, "Female"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientCovariates {
    pub sex: Sex,
    pub age_years: f64,
    pub height_in: f64,
    pub weight_kg: f64,
    pub creatinine_mg_dl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub ideal_body_weight: f64,
    pub adjusted_body_weight: f64,
    /// Cockcroft-Gault estimate, mL/min, one decimal.
    pub creatinine_clearance: f64,
    /// Mosteller BSA, m^2.
    pub body_surface_area: f64,
}

pub fn ideal_body_weight(sex: Sex, height_in: f64) -> f64 {
    sex.base_weight() + 2.3 * (height_in - 60.0)
}

pub fn adjusted_body_weight(total_weight_kg: f64, ibw_kg: f64) -> f64 {
    if total_weight_kg > ibw_kg * OBESITY_THRESHOLD {
        ibw_kg + ADJUSTMENT_FACTOR * (total_weight_kg - ibw_kg)
    } else {
        total_weight_kg
    }
}

/// Cockcroft-Gault creatinine clearance in mL/min, rounded to one decimal.
///
/// A creatinine of exactly zero yields 0 rather than an infinite clearance.
pub fn creatinine_clearance(sex: Sex, age_years: f64, weight_kg: f64, creatinine_mg_dl: f64) -> f64 {
    if creatinine_mg_dl == 0.0 {
        return 0.0;
    }

    let crcl = ((140.0 - age_years) * weight_kg) / (72.0 * creatinine_mg_dl) * sex.crcl_factor();
    round_to_tenth(crcl)
}

pub fn body_surface_area(height_cm: f64, weight_kg: f64) -> f64 {
    ((height_cm * weight_kg) / 3600.0).sqrt()
}

// f64::round rounds half away from zero.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl PatientCovariates {
    pub fn ideal_body_weight(&self) -> f64 {
        ideal_body_weight(self.sex, self.height_in)
    }

    pub fn adjusted_body_weight(&self) -> f64 {
        adjusted_body_weight(self.weight_kg, self.ideal_body_weight())
    }

    /// Uses the adjusted body weight as the weight term.
    pub fn creatinine_clearance(&self) -> f64 {
        creatinine_clearance(
            self.sex,
            self.age_years,
            self.adjusted_body_weight(),
            self.creatinine_mg_dl,
        )
    }

    pub fn body_surface_area(&self) -> f64 {
        body_surface_area(crate::config::units::inches_to_cm(self.height_in), self.weight_kg)
    }

    pub fn body_metrics(&self) -> BodyMetrics {
        BodyMetrics {
            ideal_body_weight: self.ideal_body_weight(),
            adjusted_body_weight: self.adjusted_body_weight(),
            creatinine_clearance: self.creatinine_clearance(),
            body_surface_area: self.body_surface_area(),
        }
    }
}
