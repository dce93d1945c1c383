//! Categorical vocabularies for the assessment forms.
//!
//! Every select-style form field maps to one of these closed enums. Parsing
//! is strict here; leniency (unknown value → unselected) lives in
//! `scoring::form`, which calls `FromStr` and discards the error.

use serde::{Deserialize, Serialize};

/// A select value that does not belong to the field's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownChoice {
                        kind: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Sex {
    Male => "male",
    Female => "female",
});

/// Graded symptom severity (fatigue, cough, breathlessness, chest pain,
/// allergies, chronic inflammation).
str_enum!(Severity {
    None => "none",
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

str_enum!(SmokingStatus {
    Never => "never",
    Former => "former",
    Current => "current",
});

/// Cancer assessment uses a finer smoking scale than the lung form.
str_enum!(SmokingHistory {
    Never => "never",
    Former => "former",
    FormerHeavy => "former_heavy",
    Current => "current",
    HeavyCurrent => "heavy_current",
});

str_enum!(AlcoholUse {
    None => "none",
    Light => "light",
    Moderate => "moderate",
    Heavy => "heavy",
});

str_enum!(FamilyHistoryStrength {
    None => "none",
    Moderate => "moderate",
    Strong => "strong",
});

str_enum!(ActivityLevel {
    None => "none",
    Minimal => "minimal",
    Regular => "regular",
    High => "high",
});

str_enum!(DietQuality {
    Poor => "poor",
    Average => "average",
    Good => "good",
    Excellent => "excellent",
});

str_enum!(SunExposure {
    Limited => "limited",
    Moderate => "moderate",
    Excessive => "excessive",
});

/// Occupational carcinogen / irritant exposure.
str_enum!(ExposureLevel {
    None => "none",
    Moderate => "moderate",
    High => "high",
});

str_enum!(MedicalHistoryRisk {
    None => "none",
    ModerateRisk => "moderate_risk",
    HighRisk => "high_risk",
});

str_enum!(ReproductiveHistory {
    Normal => "normal",
    HighRisk => "high_risk",
});

str_enum!(VaccinationStatus {
    Complete => "complete",
    Incomplete => "incomplete",
});

str_enum!(ChestPainType {
    TypicalAngina => "TA",
    AtypicalAngina => "ATA",
    NonAnginal => "NAP",
    Asymptomatic => "ASY",
});

str_enum!(WheezeFrequency {
    None => "none",
    Occasional => "occasional",
    Frequent => "frequent",
});

str_enum!(WeightLossLevel {
    None => "none",
    Moderate => "moderate",
    Significant => "significant",
});

str_enum!(XrayFinding {
    Normal => "normal",
    Suspicious => "suspicious",
    Abnormal => "abnormal",
});

str_enum!(Appetite {
    Good => "good",
    Poor => "poor",
});

/// Microscopy result for urine red blood cells / pus cells.
str_enum!(UrineFinding {
    Normal => "normal",
    Abnormal => "abnormal",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trip_as_str() {
        assert_eq!(Sex::from_str("female").unwrap(), Sex::Female);
        assert_eq!(Sex::Female.as_str(), "female");
        assert_eq!(
            ChestPainType::from_str("ASY").unwrap(),
            ChestPainType::Asymptomatic
        );
        assert_eq!(ChestPainType::NonAnginal.as_str(), "NAP");
        assert_eq!(
            SmokingHistory::from_str("heavy_current").unwrap(),
            SmokingHistory::HeavyCurrent
        );
    }

    #[test]
    fn unknown_value_is_an_error() {
        let err = Severity::from_str("catastrophic").unwrap_err();
        assert_eq!(err.kind, "Severity");
        assert_eq!(err.value, "catastrophic");
        assert!(err.to_string().contains("Severity"));
    }

    #[test]
    fn vocabulary_is_case_sensitive() {
        assert!(Sex::from_str("Male").is_err());
        assert!(ChestPainType::from_str("asy").is_err());
    }
}
