pub mod targets;

use serde::{Deserialize, Serialize};
use std::fmt;
use log::debug;
use crate::error::{VancoError, VancoResult};
use crate::models::auc::auc_per_dosing_interval;
use crate::models::one_compartment::{steady_state_peak, steady_state_trough};
use crate::models::PkParameters;

pub const STANDARD_INFUSION_HOURS: f64 = 1.0;
pub const DOSE_ROUNDING_MG: f64 = 100.0;

/// Supported dosing intervals. Each owns its mg/kg menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DosingFrequency {
    Q12h,
    Q24h,
    Q48h,
}

impl DosingFrequency {
    pub const ALL: [DosingFrequency; 3] = [Self::Q12h, Self::Q24h, Self::Q48h];

    pub fn hours(self) -> f64 {
        u32::from(self) as f64
    }

    pub fn mg_per_kg_menu(self) -> &'static [f64] {
        match self {
            DosingFrequency::Q12h => &[5.0, 7.0, 9.0],
            DosingFrequency::Q24h => &[7.0, 9.0, 11.0, 12.0],
            DosingFrequency::Q48h => &[12.0, 14.0, 16.0, 18.0],
        }
    }
}

impl TryFrom<u32> for DosingFrequency {
    type Error = VancoError;

    fn try_from(hours: u32) -> VancoResult<Self> {
        match hours {
            12 => Ok(DosingFrequency::Q12h),
            24 => Ok(DosingFrequency::Q24h),
            48 => Ok(DosingFrequency::Q48h),
            _ => Err(VancoError::InvalidDosing(format!(
                "Unsupported dosing frequency: every {} h (use 12, 24 or 48)",
                hours
            ))),
        }
    }
}

impl From<DosingFrequency> for u32 {
    fn from(frequency: DosingFrequency) -> u32 {
        match frequency {
            DosingFrequency::Q12h => 12,
            DosingFrequency::Q24h => 24,
            DosingFrequency::Q48h => 48,
        }
    }
}

impl fmt::Display for DosingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}h", u32::from(*self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseCandidate {
    pub dose_mg: f64,
    pub mg_per_kg: f64,
    pub peak: f64,   // mcg/mL
    pub trough: f64, // mcg/mL
    pub auc24: f64,  // mcg*hr/mL
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimenEvaluation {
    pub dose_mg: f64,
    pub tau_hours: f64,
    pub infusion_hours: f64,
    pub peak: f64,
    pub trough: f64,
    pub auc24: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseRecommendation {
    pub frequency: DosingFrequency,
    pub pk: PkParameters,
    /// In menu order, ascending mg/kg. Nothing is filtered here.
    pub candidates: Vec<DoseCandidate>,
}

/// Rounds to the nearest 100 mg.
pub fn round_to_practical_dose(dose_mg: f64) -> f64 {
    (dose_mg / DOSE_ROUNDING_MG).round() * DOSE_ROUNDING_MG
}

/// Predicted steady-state peak, trough and AUC24 for an arbitrary regimen.
pub fn evaluate_regimen(
    pk: &PkParameters,
    dose_mg: f64,
    tau_hours: f64,
    infusion_hours: f64,
) -> VancoResult<RegimenEvaluation> {
    if !dose_mg.is_finite() || dose_mg <= 0.0 {
        return Err(VancoError::InvalidDosing(format!("Dose must be positive, got {}", dose_mg)));
    }
    if !infusion_hours.is_finite() || infusion_hours <= 0.0 {
        return Err(VancoError::InvalidDosing(format!(
            "Infusion duration must be positive, got {}",
            infusion_hours
        )));
    }
    if !tau_hours.is_finite() || tau_hours < infusion_hours {
        return Err(VancoError::InvalidDosing(format!(
            "Dosing interval {} h is shorter than the infusion of {} h",
            tau_hours, infusion_hours
        )));
    }

    let peak = steady_state_peak(dose_mg, pk.vd, pk.k, infusion_hours)?;
    let trough = steady_state_trough(peak, pk.k, tau_hours, infusion_hours);
    let auc24 = auc_per_dosing_interval(peak, trough, tau_hours, infusion_hours)?;

    Ok(RegimenEvaluation {
        dose_mg,
        tau_hours,
        infusion_hours,
        peak,
        trough,
        auc24,
    })
}

pub fn recommend_doses(weight_kg: f64, crcl: f64, frequency: DosingFrequency) -> VancoResult<DoseRecommendation> {
    let pk = PkParameters::from_covariates(weight_kg, crcl)?;
    debug!(
        "PK parameters: Vd = {:.2} L, CL = {:.3} L/hr, k = {:.4} 1/hr",
        pk.vd, pk.cl, pk.k
    );

    let candidates = frequency
        .mg_per_kg_menu()
        .iter()
        .map(|&mg_per_kg| -> VancoResult<DoseCandidate> {
            let dose_mg = round_to_practical_dose(mg_per_kg * weight_kg);
            let regimen = evaluate_regimen(&pk, dose_mg, frequency.hours(), STANDARD_INFUSION_HOURS)?;
            Ok(DoseCandidate {
                dose_mg,
                mg_per_kg,
                peak: regimen.peak,
                trough: regimen.trough,
                auc24: regimen.auc24,
            })
        })
        .collect::<VancoResult<Vec<_>>>()?;

    Ok(DoseRecommendation { frequency, pk, candidates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frequency_table() {
        assert_eq!(DosingFrequency::Q12h.mg_per_kg_menu(), &[5.0, 7.0, 9.0]);
        assert_eq!(DosingFrequency::Q24h.mg_per_kg_menu().len(), 4);
        assert_eq!(DosingFrequency::Q48h.mg_per_kg_menu()[3], 18.0);
        assert_eq!(DosingFrequency::try_from(48).unwrap(), DosingFrequency::Q48h);
        assert!(DosingFrequency::try_from(8).is_err());
        assert_eq!(DosingFrequency::Q24h.to_string(), "q24h");
    }

    #[test]
    fn test_practical_dose_rounding() {
        assert_eq!(round_to_practical_dose(560.0), 600.0);
        assert_eq!(round_to_practical_dose(720.0), 700.0);
        assert_eq!(round_to_practical_dose(650.0), 700.0);
        assert_eq!(round_to_practical_dose(649.9), 600.0);
    }

    #[test]
    fn test_q12_recommendations_for_80kg() {
        let rec = recommend_doses(80.0, 70.0, DosingFrequency::Q12h).unwrap();

        assert_relative_eq!(rec.pk.vd, 40.8, epsilon = 1e-9);
        assert_eq!(rec.candidates.len(), 3);

        let mg_per_kg: Vec<f64> = rec.candidates.iter().map(|c| c.mg_per_kg).collect();
        assert_eq!(mg_per_kg, vec![5.0, 7.0, 9.0]);
        let doses: Vec<f64> = rec.candidates.iter().map(|c| c.dose_mg).collect();
        assert_eq!(doses, vec![400.0, 600.0, 700.0]);

        for pair in rec.candidates.windows(2) {
            assert!(pair[1].dose_mg > pair[0].dose_mg);
            assert!(pair[1].auc24 > pair[0].auc24);
        }

        let first = &rec.candidates[0];
        assert_relative_eq!(first.peak, 400.0 / 3.6624, epsilon = 1e-9);
        assert_relative_eq!(first.trough, first.peak * (-rec.pk.k * 11.0).exp(), epsilon = 1e-9);
        assert_relative_eq!(first.auc24, 1676.8, epsilon = 0.1);
    }

    #[test]
    fn test_every_menu_entry_is_kept() {
        for frequency in DosingFrequency::ALL {
            let rec = recommend_doses(80.0, 70.0, frequency).unwrap();
            assert_eq!(rec.candidates.len(), frequency.mg_per_kg_menu().len());
            for candidate in &rec.candidates {
                assert_eq!(candidate.dose_mg % 100.0, 0.0);
            }
        }
    }

    #[test]
    fn test_zero_crcl_is_domain_error() {
        assert!(matches!(
            recommend_doses(80.0, 0.0, DosingFrequency::Q12h),
            Err(VancoError::Domain { .. })
        ));
    }

    #[test]
    fn test_explicit_regimen_evaluation() {
        let pk = PkParameters::from_covariates(80.0, 70.0).unwrap();
        let eval = evaluate_regimen(&pk, 1250.0, 18.0, 2.0).unwrap();

        let peak = 1250.0 / (pk.vd * pk.k * 2.0);
        assert_relative_eq!(eval.peak, peak, epsilon = 1e-9);
        assert_relative_eq!(eval.trough, peak * (-pk.k * 16.0).exp(), epsilon = 1e-9);
        assert!(eval.auc24 > 0.0);

        assert!(evaluate_regimen(&pk, -5.0, 12.0, 1.0).is_err());
        assert!(evaluate_regimen(&pk, 1000.0, 12.0, 0.0).is_err());
        assert!(evaluate_regimen(&pk, 1000.0, 1.0, 2.0).is_err());
    }
}
