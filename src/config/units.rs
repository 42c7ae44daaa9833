use serde::{Deserialize, Serialize};

pub const LB_TO_KG: f64 = 0.453592;
pub const IN_TO_CM: f64 = 2.54;
pub const UMOL_TO_MG_DL: f64 = 0.0113;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "kg")]
    Kg,
    #[serde(rename = "lb")]
    Lb,
}

impl WeightUnit {
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * LB_TO_KG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeightUnit {
    #[default]
    #[serde(rename = "in")]
    In,
    #[serde(rename = "cm")]
    Cm,
}

impl HeightUnit {
    pub fn to_inches(self, value: f64) -> f64 {
        match self {
            HeightUnit::In => value,
            HeightUnit::Cm => value / IN_TO_CM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CreatinineUnit {
    #[default]
    #[serde(rename = "mg/dL")]
    MgPerDl,
    #[serde(rename = "umol/L")]
    UmolPerL,
}

impl CreatinineUnit {
    pub fn to_mg_dl(self, value: f64) -> f64 {
        match self {
            CreatinineUnit::MgPerDl => value,
            CreatinineUnit::UmolPerL => value * UMOL_TO_MG_DL,
        }
    }
}

pub fn inches_to_cm(inches: f64) -> f64 {
    inches * IN_TO_CM
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_conversions() {
        assert_relative_eq!(WeightUnit::Lb.to_kg(176.0), 79.832192, epsilon = 1e-9);
        assert_relative_eq!(WeightUnit::Kg.to_kg(80.0), 80.0);
        assert_relative_eq!(HeightUnit::Cm.to_inches(177.8), 70.0, epsilon = 1e-9);
        assert_relative_eq!(CreatinineUnit::UmolPerL.to_mg_dl(88.4), 0.99892, epsilon = 1e-9);
        assert_relative_eq!(inches_to_cm(70.0), 177.8, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_names_deserialize() {
        let unit: CreatinineUnit = serde_json::from_str("\"umol/L\"").unwrap();
        assert_eq!(unit, CreatinineUnit::UmolPerL);
        let unit: HeightUnit = serde_json::from_str("\"cm\"").unwrap();
        assert_eq!(unit, HeightUnit::Cm);
    }
}
