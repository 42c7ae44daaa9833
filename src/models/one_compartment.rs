//! One-compartment intravenous infusion model.
//!
//! Steady-state peak and trough use the closed forms
//!
//! ```text
//! Cmax = dose / (Vd * k * t_inf)
//! Cmin = Cmax * exp(-k * (tau - t_inf))
//! ```
//!
//! The trough decays from the peak over `tau - t_inf`, which assumes the peak
//! occurs exactly at the end of the infusion.

use super::{DoseEvent, PkParameters};
use crate::error::{VancoError, VancoResult};

/// Smallest k * t_inf accepted before the infusion scale is treated as singular.
pub const MIN_K_TINF: f64 = 1e-12;

/// dose / (Vd * k * t_inf), guarded against a vanishing denominator.
fn infusion_scale(dose: f64, vd: f64, k: f64, infusion_hours: f64) -> VancoResult<f64> {
    let k_tinf = k * infusion_hours;
    if !k_tinf.is_finite() || k_tinf < MIN_K_TINF {
        return Err(VancoError::Domain { quantity: "k * t_inf", value: k_tinf });
    }
    if !(vd > 0.0) {
        return Err(VancoError::Domain { quantity: "volume of distribution", value: vd });
    }
    Ok(dose / (vd * k_tinf))
}

pub fn steady_state_peak(dose: f64, vd: f64, k: f64, infusion_hours: f64) -> VancoResult<f64> {
    infusion_scale(dose, vd, k, infusion_hours)
}

pub fn steady_state_trough(peak: f64, k: f64, tau: f64, infusion_hours: f64) -> f64 {
    peak * (-k * (tau - infusion_hours)).exp()
}

#[derive(Debug, Clone)]
pub struct OneCompartmentModel {
    params: PkParameters,
}

impl OneCompartmentModel {
    pub fn new(params: PkParameters) -> Self {
        Self { params }
    }

    /// Superposition of every infusion started at or before `time`.
    pub fn calculate_concentration(&self, time: f64, dose_events: &[DoseEvent]) -> VancoResult<f64> {
        let k = self.params.k;
        let mut concentration = 0.0;

        for dose in dose_events {
            if dose.time > time {
                continue;
            }
            let t = time - dose.time;
            let scale = infusion_scale(dose.amount, self.params.vd, k, dose.duration)?;

            if t <= dose.duration {
                // During infusion
                concentration += scale * (1.0 - (-k * t).exp());
            } else {
                // After infusion
                let conc_end = scale * (1.0 - (-k * dose.duration).exp());
                concentration += conc_end * (-k * (t - dose.duration)).exp();
            }
        }

        Ok(concentration)
    }
}

/// Multiple-dose concentration profile for `dose` given every `tau` hours from t = 0.
pub fn concentration_time_series(
    dose: f64,
    tau: f64,
    k: f64,
    vd: f64,
    infusion_hours: f64,
    time_points: &[f64],
) -> VancoResult<Vec<f64>> {
    if !tau.is_finite() || tau <= 0.0 {
        return Err(VancoError::Domain { quantity: "tau", value: tau });
    }

    let model = OneCompartmentModel::new(PkParameters { vd, cl: k * vd, k });

    time_points
        .iter()
        .map(|&t| {
            let events: Vec<DoseEvent> = if t < 0.0 {
                Vec::new()
            } else {
                let n_doses = (t / tau).floor() as usize;
                (0..=n_doses)
                    .map(|i| DoseEvent {
                        time: i as f64 * tau,
                        amount: dose,
                        duration: infusion_hours,
                    })
                    .collect()
            };
            model.calculate_concentration(t, &events)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VD: f64 = 40.8;
    const K: f64 = 3.6624 / 40.8;

    #[test]
    fn test_peak_closed_form() {
        let peak = steady_state_peak(1000.0, VD, K, 1.0).unwrap();
        assert_relative_eq!(peak, 1000.0 / (VD * K), epsilon = 1e-9);
    }

    #[test]
    fn test_peak_matches_unsimplified_form_for_small_k() {
        // dose * (1 - e^-kt) / (Vd * k * t * (1 - e^-kt))
        let dose = 1000.0;
        for k in [1e-2, 1e-3, 1e-4, 1e-5, 1e-6] {
            let x = 1.0 - (-k * 1.0_f64).exp();
            let unsimplified = (dose * x) / (VD * k * 1.0 * x);
            let peak = steady_state_peak(dose, VD, k, 1.0).unwrap();
            assert_relative_eq!(peak, unsimplified, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_peak_guards_vanishing_rate() {
        assert!(matches!(
            steady_state_peak(1000.0, VD, 0.0, 1.0),
            Err(VancoError::Domain { quantity: "k * t_inf", .. })
        ));
        assert!(steady_state_peak(1000.0, VD, K, 0.0).is_err());
        assert!(steady_state_peak(1000.0, VD, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_trough_decays_from_peak() {
        let trough = steady_state_trough(100.0, 0.1, 12.0, 1.0);
        assert_relative_eq!(trough, 100.0 * (-1.1_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(steady_state_trough(100.0, 0.1, 1.0, 1.0), 100.0);
    }

    #[test]
    fn test_series_is_zero_at_time_zero() {
        for (k, tau) in [(K, 12.0), (0.3, 24.0), (0.01, 48.0)] {
            let series = concentration_time_series(1000.0, tau, k, VD, 1.0, &[0.0]).unwrap();
            assert_eq!(series[0], 0.0);
        }
    }

    #[test]
    fn test_series_within_first_interval_is_single_dose() {
        let dose = 1000.0;
        let scale = dose / (VD * K);
        let series = concentration_time_series(dose, 12.0, K, VD, 1.0, &[0.5, 1.0, 6.0]).unwrap();

        assert_relative_eq!(series[0], scale * (1.0 - (-K * 0.5).exp()), epsilon = 1e-9);
        assert_relative_eq!(series[1], scale * (1.0 - (-K).exp()), epsilon = 1e-9);
        let end = scale * (1.0 - (-K).exp());
        assert_relative_eq!(series[2], end * (-K * 5.0).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_series_superposes_prior_doses() {
        let dose = 1000.0;
        let tau = 12.0;
        let scale = dose / (VD * K);
        let end = scale * (1.0 - (-K).exp());

        let series = concentration_time_series(dose, tau, K, VD, 1.0, &[13.0]).unwrap();
        let first = end * (-K * 12.0).exp();
        let second = end;
        assert_relative_eq!(series[0], first + second, epsilon = 1e-9);

        // Accumulation: each later trough-time sample exceeds the previous
        let troughs = concentration_time_series(dose, tau, K, VD, 1.0, &[11.9, 23.9, 35.9, 47.9]).unwrap();
        for pair in troughs.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_series_rejects_non_positive_tau() {
        assert!(concentration_time_series(1000.0, 0.0, K, VD, 1.0, &[1.0]).is_err());
    }

    #[test]
    fn test_model_ignores_future_doses() {
        let model = OneCompartmentModel::new(PkParameters { vd: VD, cl: K * VD, k: K });
        let events = [DoseEvent { time: 5.0, amount: 1000.0, duration: 1.0 }];
        assert_eq!(model.calculate_concentration(4.0, &events).unwrap(), 0.0);
        assert_eq!(model.calculate_concentration(4.0, &[]).unwrap(), 0.0);
    }
}
