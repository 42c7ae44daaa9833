use serde::{Deserialize, Serialize};
use std::fmt;
use super::{DoseCandidate, DoseRecommendation};

/// Inclusive numeric interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.min, self.max)
    }
}

pub const ACCEPTABLE_AUC: Bounds = Bounds::new(400.0, 600.0);
pub const SUGGESTED_AUC: Bounds = Bounds::new(500.0, 600.0);
pub const TARGET_TROUGH: Bounds = Bounds::new(10.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AucAssessment {
    Subtherapeutic,
    Acceptable,
    Suggested,
    Supratherapeutic,
}

/// The suggested band takes precedence when it overlaps the acceptable one.
pub fn assess_auc(auc24: f64, acceptable: &Bounds, suggested: &Bounds) -> AucAssessment {
    if suggested.contains(auc24) {
        AucAssessment::Suggested
    } else if acceptable.contains(auc24) {
        AucAssessment::Acceptable
    } else if auc24 < acceptable.min {
        AucAssessment::Subtherapeutic
    } else {
        AucAssessment::Supratherapeutic
    }
}

impl DoseRecommendation {
    /// First candidate, in menu order, whose AUC24 falls in `band`.
    pub fn suggested(&self, band: &Bounds) -> Option<&DoseCandidate> {
        self.candidates.iter().find(|c| band.contains(c.auc24))
    }

    pub fn within(&self, band: &Bounds) -> Vec<&DoseCandidate> {
        self.candidates.iter().filter(|c| band.contains(c.auc24)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dosing::{recommend_doses, DosingFrequency};

    #[test]
    fn test_assessment_bands() {
        let assess = |auc| assess_auc(auc, &ACCEPTABLE_AUC, &SUGGESTED_AUC);
        assert_eq!(assess(350.0), AucAssessment::Subtherapeutic);
        assert_eq!(assess(400.0), AucAssessment::Acceptable);
        assert_eq!(assess(499.9), AucAssessment::Acceptable);
        assert_eq!(assess(500.0), AucAssessment::Suggested);
        assert_eq!(assess(600.0), AucAssessment::Suggested);
        assert_eq!(assess(600.1), AucAssessment::Supratherapeutic);
    }

    #[test]
    fn test_no_candidate_in_suggested_band() {
        // Every q12h candidate for this patient overshoots 600
        let rec = recommend_doses(80.0, 70.0, DosingFrequency::Q12h).unwrap();
        assert!(rec.suggested(&SUGGESTED_AUC).is_none());
        assert!(rec.within(&ACCEPTABLE_AUC).is_empty());
    }

    #[test]
    fn test_single_candidate_in_suggested_band() {
        // AUC24 roughly 321, 428, 535 for 5, 7, 9 mg/kg
        let rec = recommend_doses(60.0, 150.0, DosingFrequency::Q12h).unwrap();

        let suggested = rec.within(&SUGGESTED_AUC);
        assert_eq!(suggested.len(), 1);
        assert_eq!(suggested[0].mg_per_kg, 9.0);
        assert_eq!(suggested[0].dose_mg, 500.0);

        let picked = rec.suggested(&SUGGESTED_AUC).unwrap();
        assert_eq!(picked, suggested[0]);

        // 7 mg/kg is acceptable but not suggested
        assert_eq!(rec.within(&ACCEPTABLE_AUC).len(), 2);
    }
}
