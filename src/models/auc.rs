//! AUC over one steady-state dosing interval.
//!
//! The interval is split at the end of the infusion:
//!
//! ```text
//! infusion:    (Cmax + Cmin) / 2 * t_inf
//! elimination: (Cmax - Cmin) * (tau - t_inf) / ln(Cmax / Cmin)
//! AUC24      = (infusion + elimination) * 24 / tau
//! ```
//!
//! When peak and trough coincide (k -> 0) the log trapezoid is replaced by the
//! linear one, which is its limit.

use serde::{Deserialize, Serialize};
use crate::error::{VancoError, VancoResult};

/// Relative peak/trough difference below which the profile is treated as flat.
pub const FLAT_PROFILE_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalAuc {
    pub infusion: f64,
    pub elimination: f64,
    /// AUC over one dosing interval (mcg*hr/mL)
    pub tau: f64,
    /// AUC scaled to 24 hours
    pub auc24: f64,
}

pub fn linear_trapezoid(c1: f64, c2: f64, dt: f64) -> f64 {
    (c1 + c2) / 2.0 * dt
}

/// Log-linear trapezoid for a declining segment. Both concentrations must be positive.
pub fn log_trapezoid(c1: f64, c2: f64, dt: f64) -> VancoResult<f64> {
    if !(c1 > 0.0) {
        return Err(VancoError::Domain { quantity: "peak", value: c1 });
    }
    if !(c2 > 0.0) {
        return Err(VancoError::Domain { quantity: "trough", value: c2 });
    }

    let ratio = c1 / c2;
    if (ratio - 1.0).abs() < FLAT_PROFILE_TOLERANCE {
        return Ok(linear_trapezoid(c1, c2, dt));
    }
    Ok((c1 - c2) * dt / ratio.ln())
}

pub fn interval_auc(peak: f64, trough: f64, tau: f64, infusion_hours: f64) -> VancoResult<IntervalAuc> {
    if !tau.is_finite() || tau <= 0.0 {
        return Err(VancoError::Domain { quantity: "tau", value: tau });
    }
    let elimination_time = tau - infusion_hours;
    if elimination_time < 0.0 {
        return Err(VancoError::Domain { quantity: "tau - t_inf", value: elimination_time });
    }

    let elimination = log_trapezoid(peak, trough, elimination_time)?;
    let infusion = linear_trapezoid(peak, trough, infusion_hours);
    let auc_tau = infusion + elimination;

    Ok(IntervalAuc {
        infusion,
        elimination,
        tau: auc_tau,
        auc24: auc_tau * 24.0 / tau,
    })
}

pub fn auc_per_dosing_interval(peak: f64, trough: f64, tau: f64, infusion_hours: f64) -> VancoResult<f64> {
    interval_auc(peak, trough, tau, infusion_hours).map(|auc| auc.auc24)
}
