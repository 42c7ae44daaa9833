pub mod curve;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use log::{debug, info, warn};
use crate::config::Config;
use crate::dosing::targets::{assess_auc, AucAssessment};
use crate::dosing::{evaluate_regimen, recommend_doses, DoseCandidate, DosingFrequency, RegimenEvaluation};
use crate::error::VancoResult;
use crate::models::PkParameters;
use crate::patient::{BodyMetrics, PatientCovariates};
use crate::safety::{check_dose_limits, check_renal_function, validate_covariates, DoseLimitCheck, RenalStatus};

pub use curve::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewedCandidate {
    #[serde(flatten)]
    pub candidate: DoseCandidate,
    pub assessment: AucAssessment,
    pub dose_limits: DoseLimitCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseSource {
    Suggested,
    Explicit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedRegimen {
    pub source: DoseSource,
    pub evaluation: RegimenEvaluation,
    pub assessment: AucAssessment,
    pub dose_limits: DoseLimitCheck,
    pub curve: ConcentrationCurve,
}

/// Everything computed for one patient and dosing frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosingPlan {
    pub generated_at: DateTime<Utc>,
    pub covariates: PatientCovariates,
    pub metrics: BodyMetrics,
    pub renal_status: RenalStatus,
    pub frequency: DosingFrequency,
    pub pk: PkParameters,
    pub candidates: Vec<ReviewedCandidate>,
    pub selected: Option<SelectedRegimen>,
}

impl DosingPlan {
    pub fn suggested(&self) -> Option<&ReviewedCandidate> {
        self.candidates.iter().find(|c| c.assessment == AucAssessment::Suggested)
    }
}

pub struct Simulator {
    config: Config,
}

impl Simulator {
    pub fn new(config: Config) -> VancoResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Covariates -> body metrics -> safety checks -> candidates -> selected regimen and curve.
    pub fn run(&self) -> VancoResult<DosingPlan> {
        let limits = &self.config.limits;
        let covariates = self.config.patient.to_covariates();
        validate_covariates(&covariates, limits)?;

        let metrics = covariates.body_metrics();
        info!(
            "IBW {:.1} kg, AdjBW {:.1} kg, CrCl {:.1} mL/min",
            metrics.ideal_body_weight, metrics.adjusted_body_weight, metrics.creatinine_clearance
        );

        let renal_status = check_renal_function(metrics.creatinine_clearance, limits)?;

        let frequency = self.config.dosing.frequency;
        let recommendation = recommend_doses(
            metrics.adjusted_body_weight,
            metrics.creatinine_clearance,
            frequency,
        )?;

        let candidates: Vec<ReviewedCandidate> = recommendation.candidates
            .iter()
            .map(|candidate| ReviewedCandidate {
                candidate: candidate.clone(),
                assessment: assess_auc(candidate.auc24, &limits.target_auc, &limits.suggested_auc),
                dose_limits: check_dose_limits(candidate.dose_mg, limits),
            })
            .collect();

        for reviewed in &candidates {
            debug!(
                "{} mg ({} mg/kg) {}: AUC24 {:.0}, peak {:.1}, trough {:.1} ({:?})",
                reviewed.candidate.dose_mg,
                reviewed.candidate.mg_per_kg,
                frequency,
                reviewed.candidate.auc24,
                reviewed.candidate.peak,
                reviewed.candidate.trough,
                reviewed.assessment
            );
        }

        let choice = match self.config.dosing.dose {
            Some(dose) => Some((dose, DoseSource::Explicit)),
            None => recommendation
                .suggested(&limits.suggested_auc)
                .map(|c| (c.dose_mg, DoseSource::Suggested)),
        };

        let selected = match choice {
            Some((dose, source)) => Some(self.select_regimen(&recommendation.pk, dose, source)?),
            None => {
                info!("No {} candidate reaches the suggested AUC24 band ({})", frequency, limits.suggested_auc);
                None
            }
        };

        Ok(DosingPlan {
            generated_at: Utc::now(),
            covariates,
            metrics,
            renal_status,
            frequency,
            pk: recommendation.pk,
            candidates,
            selected,
        })
    }

    fn select_regimen(&self, pk: &PkParameters, dose_mg: f64, source: DoseSource) -> VancoResult<SelectedRegimen> {
        let limits = &self.config.limits;
        let tau = self.config.dosing.frequency.hours();
        let infusion = self.config.dosing.infusion_hours;

        let evaluation = evaluate_regimen(pk, dose_mg, tau, infusion)?;
        let dose_limits = check_dose_limits(dose_mg, limits);
        if dose_limits != DoseLimitCheck::WithinLimits {
            warn!(
                "{} mg is outside the single-dose limits of {} to {} mg",
                dose_mg, limits.min_dose_mg, limits.max_single_dose_mg
            );
        }

        let curve = ConcentrationCurve::simulate(
            pk,
            dose_mg,
            tau,
            infusion,
            &self.config.simulation.time_points,
        )?;

        info!(
            "Selected {} mg {} over {} h: AUC24 {:.1}, peak {:.1}, trough {:.1}",
            dose_mg, self.config.dosing.frequency, infusion, evaluation.auc24, evaluation.peak, evaluation.trough
        );

        Ok(SelectedRegimen {
            source,
            assessment: assess_auc(evaluation.auc24, &limits.target_auc, &limits.suggested_auc),
            evaluation,
            dose_limits,
            curve,
        })
    }
}
