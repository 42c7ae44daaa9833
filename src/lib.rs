//! Vancomycin dosing from population one-compartment pharmacokinetics.
//!
//! Patient covariates are reduced to body-size and renal-function metrics
//! ([`patient`]), which drive volume of distribution, clearance and the
//! elimination rate ([`models`]). Candidate doses from a per-frequency mg/kg
//! menu are scored by predicted steady-state peak, trough and AUC24
//! ([`dosing`]); [`simulation::Simulator`] ties the steps together.

pub mod config;
pub mod dosing;
pub mod error;
pub mod models;
pub mod output;
pub mod patient;
pub mod safety;
pub mod simulation;

pub use crate::config::Config;
pub use crate::dosing::{recommend_doses, DoseCandidate, DoseRecommendation, DosingFrequency};
pub use crate::error::{VancoError, VancoResult};
pub use crate::models::PkParameters;
pub use crate::patient::{BodyMetrics, PatientCovariates, Sex};
pub use crate::simulation::{DosingPlan, Simulator};
