use serde::{Deserialize, Serialize};
use crate::dosing::targets::Bounds;
use crate::error::VancoResult;
use crate::models::one_compartment::concentration_time_series;
use crate::models::PkParameters;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub time: f64,
    pub concentration: f64,
}

/// Multiple-dose concentration profile sampled at fixed time points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentrationCurve {
    pub dose_mg: f64,
    pub tau_hours: f64,
    pub infusion_hours: f64,
    pub observations: Vec<Observation>,
}

impl ConcentrationCurve {
    pub fn simulate(
        pk: &PkParameters,
        dose_mg: f64,
        tau_hours: f64,
        infusion_hours: f64,
        time_points: &[f64],
    ) -> VancoResult<Self> {
        let concentrations =
            concentration_time_series(dose_mg, tau_hours, pk.k, pk.vd, infusion_hours, time_points)?;

        let observations = time_points
            .iter()
            .zip(concentrations)
            .map(|(&time, concentration)| Observation { time, concentration })
            .collect();

        Ok(Self {
            dose_mg,
            tau_hours,
            infusion_hours,
            observations,
        })
    }

    pub fn max_concentration(&self) -> f64 {
        self.observations.iter()
            .map(|obs| obs.concentration)
            .fold(0.0, f64::max)
    }

    pub fn time_to_max(&self) -> Option<f64> {
        self.observations.iter()
            .max_by(|a, b| a.concentration.total_cmp(&b.concentration))
            .map(|obs| obs.time)
    }

    /// Linear trapezoid over the sampled points.
    pub fn auc(&self) -> f64 {
        self.observations.windows(2)
            .map(|w| (w[1].time - w[0].time) * (w[0].concentration + w[1].concentration) / 2.0)
            .sum()
    }

    /// Sampled points whose concentration lies in `band`.
    pub fn points_within(&self, band: &Bounds) -> usize {
        self.observations.iter()
            .filter(|obs| band.contains(obs.concentration))
            .count()
    }
}
