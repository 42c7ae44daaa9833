pub mod auc;
pub mod one_compartment;

use serde::{Deserialize, Serialize};
use crate::error::{VancoError, VancoResult};

/// Volume of distribution per kg of dosing weight (Adane 2015), L/kg.
pub const VD_FACTOR: f64 = 0.51;
/// Population vancomycin clearance (L/hr) at the reference CrCl.
pub const CL_SLOPE: f64 = 6.54;
pub const CL_REFERENCE_CRCL: f64 = 125.0;

#[derive(Debug, Clone)]
pub struct DoseEvent {
    pub time: f64,
    pub amount: f64,
    /// Infusion duration (hr)
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PkParameters {
    pub vd: f64, // L
    pub cl: f64, // L/hr
    pub k: f64,  // 1/hr
}

impl PkParameters {
    /// Population estimates from dosing weight (kg) and CrCl (mL/min).
    pub fn from_covariates(weight_kg: f64, crcl: f64) -> VancoResult<Self> {
        let vd = volume_of_distribution(weight_kg);
        let cl = clearance(crcl);
        let k = elimination_rate(cl, vd)?;
        Ok(Self { vd, cl, k })
    }

    pub fn half_life(&self) -> f64 {
        if self.k > 0.0 {
            std::f64::consts::LN_2 / self.k
        } else {
            f64::INFINITY
        }
    }
}

pub fn volume_of_distribution(weight_kg: f64) -> f64 {
    VD_FACTOR * weight_kg
}

pub fn clearance(crcl: f64) -> f64 {
    CL_SLOPE * crcl / CL_REFERENCE_CRCL
}

pub fn elimination_rate(cl: f64, vd: f64) -> VancoResult<f64> {
    if !(vd > 0.0) || !vd.is_finite() {
        return Err(VancoError::Domain { quantity: "volume of distribution", value: vd });
    }
    Ok(cl / vd)
}
