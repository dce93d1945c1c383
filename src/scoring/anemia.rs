//! Anemia detection from a complete blood count plus symptoms.
//!
//! Severity accumulates from sex-specific hemoglobin bands, red-cell
//! indices, iron/vitamin studies and a 0–5 symptom score. The MCV bands
//! drive a secondary classification (microcytic / macrocytic / normocytic)
//! independent of the numeric severity, except for the fixed +1 each
//! abnormal band adds. Buckets: severe ≥ 8, high ≥ 5, moderate ≥ 3, else
//! low.

use serde::Serialize;

use crate::models::{Severity, Sex};

use super::{map_bucket, AssessmentForm, ScoreCard};

#[derive(Debug, Clone, Default)]
pub struct AnemiaInput {
    pub sex: Option<Sex>,
    /// Hemoglobin, g/dL.
    pub hemoglobin: f64,
    /// Hematocrit, %.
    pub hematocrit: f64,
    /// Mean corpuscular volume, fL.
    pub mcv: f64,
    /// Red cell distribution width, %.
    pub rdw: f64,
    /// Ferritin, ng/mL.
    pub ferritin: f64,
    /// Vitamin B12, pg/mL.
    pub vitamin_b12: f64,
    /// Folate, ng/mL.
    pub folate: f64,
    pub fatigue: Option<Severity>,
    pub breathlessness: bool,
    pub cold_hands: bool,
    pub pale_skin: bool,
}

impl AnemiaInput {
    pub fn from_form(form: &AssessmentForm) -> Self {
        Self {
            sex: form.choice("sex"),
            hemoglobin: form.number("hemoglobin"),
            hematocrit: form.number("hematocrit"),
            mcv: form.number("mcv"),
            rdw: form.number("rdw"),
            ferritin: form.number("ferritin"),
            vitamin_b12: form.number("vitamin_b12"),
            folate: form.number("folate"),
            fatigue: form.choice("fatigue"),
            breathlessness: form.flag("breathlessness"),
            cold_hands: form.flag("cold_hands"),
            pale_skin: form.flag("pale_skin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Severe => "Severe",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary classification from the MCV bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnemiaType {
    NoSignificantAnemia,
    Microcytic,
    Macrocytic,
    Normocytic,
    /// MCV not measured — size classification unavailable.
    Unclassified,
}

impl AnemiaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSignificantAnemia => "No Significant Anemia",
            Self::Microcytic => "Microcytic Anemia (Iron Deficiency)",
            Self::Macrocytic => "Macrocytic Anemia (B12/Folate Deficiency)",
            Self::Normocytic => "Normocytic Anemia",
            Self::Unclassified => "Normal",
        }
    }
}

impl std::fmt::Display for AnemiaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range annotation for a single lab value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabStatus {
    Normal,
    Low,
    High,
}

impl LabStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Low => "Low",
            Self::High => "High",
        }
    }
}

/// One annotated lab row for the result panel.
#[derive(Debug, Clone, Serialize)]
pub struct LabValue {
    pub name: &'static str,
    pub value: String,
    pub status: LabStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnemiaAssessment {
    pub risk: RiskLevel,
    pub anemia_type: AnemiaType,
    pub confidence: u8,
    pub recommendations: Vec<&'static str>,
    pub lab_values: Vec<LabValue>,
}

/// Sex-specific hemoglobin reference range, g/dL.
fn hb_in_range(hb: f64, sex: Option<Sex>) -> bool {
    match sex {
        Some(Sex::Male) => (13.8..=17.2).contains(&hb),
        _ => (12.1..=15.1).contains(&hb),
    }
}

/// Score an anemia input record. Pure and deterministic.
pub fn assess(input: &AnemiaInput) -> AnemiaAssessment {
    let mut card = ScoreCard::new();

    // Hemoglobin bands are sex-specific; an unmeasured value contributes
    // nothing. Any out-of-range measurement contributes at least +1.
    if input.hemoglobin > 0.0 && !hb_in_range(input.hemoglobin, input.sex) {
        let bands: &[(f64, i32)] = if input.sex == Some(Sex::Male) {
            &[(11.0, 3), (13.0, 2)]
        } else {
            &[(10.0, 3), (12.0, 2)]
        };
        let before = card.total();
        card.grade_below(input.hemoglobin, bands);
        if card.total() == before {
            card.add(1);
        }
    }

    // MCV drives the size classification; abnormal bands add +1 each.
    let mut anemia_type = AnemiaType::Unclassified;
    if input.mcv > 0.0 {
        if input.mcv < 80.0 {
            anemia_type = AnemiaType::Microcytic;
            card.add(1);
        } else if input.mcv > 100.0 {
            anemia_type = AnemiaType::Macrocytic;
            card.add(1);
        } else {
            anemia_type = AnemiaType::Normocytic;
        }
    }

    card.grade_below(input.ferritin, &[(15.0, 2)]);
    card.grade_below(input.vitamin_b12, &[(200.0, 2)]);
    card.grade_below(input.folate, &[(2.0, 1)]);
    if input.rdw > 14.5 {
        card.add(1);
    }

    // Symptom score, 0–5.
    card.add(match input.fatigue {
        Some(Severity::Severe) => 2,
        Some(Severity::Moderate) => 1,
        _ => 0,
    });
    if input.breathlessness {
        card.add(1);
    }
    if input.cold_hands {
        card.add(1);
    }
    if input.pale_skin {
        card.add(1);
    }

    let severity = card.total();
    let risk = map_bucket(
        severity,
        &[
            (8, RiskLevel::Severe),
            (5, RiskLevel::High),
            (3, RiskLevel::Moderate),
        ],
        RiskLevel::Low,
    );
    let confidence = (60 + severity * 5).clamp(60, 95) as u8;

    if severity < 2 {
        anemia_type = AnemiaType::NoSignificantAnemia;
    }

    AnemiaAssessment {
        risk,
        anemia_type,
        confidence,
        recommendations: recommendations_for(anemia_type, severity),
        lab_values: lab_values_for(input),
    }
}

fn recommendations_for(anemia_type: AnemiaType, severity: i32) -> Vec<&'static str> {
    let mut recommendations = Vec::new();

    if anemia_type == AnemiaType::Microcytic {
        recommendations.extend([
            "Increase iron-rich foods (red meat, spinach, lentils)",
            "Take iron supplements as prescribed by doctor",
            "Combine iron intake with vitamin C for better absorption",
        ]);
    }
    if anemia_type == AnemiaType::Macrocytic {
        recommendations.extend([
            "Include B12 sources: meat, fish, dairy products",
            "Add folate-rich foods: leafy greens, citrus fruits",
            "Consider B12 injections if severely deficient",
        ]);
    }
    if severity >= 3 {
        recommendations.extend([
            "Consult hematologist for detailed evaluation",
            "Get complete blood workup including reticulocyte count",
        ]);
    }
    recommendations.extend([
        "Regular monitoring of blood parameters",
        "Maintain balanced diet with adequate protein",
        "Avoid excessive tea/coffee with iron-rich meals",
    ]);

    recommendations.truncate(6);
    recommendations
}

fn lab_values_for(input: &AnemiaInput) -> Vec<LabValue> {
    let hct_floor = if input.sex == Some(Sex::Male) { 41.0 } else { 36.0 };
    vec![
        LabValue {
            name: "Hemoglobin",
            value: format!("{} g/dL", input.hemoglobin),
            status: if hb_in_range(input.hemoglobin, input.sex) {
                LabStatus::Normal
            } else {
                LabStatus::Low
            },
        },
        LabValue {
            name: "Hematocrit",
            value: format!("{}%", input.hematocrit),
            status: if input.hematocrit >= hct_floor {
                LabStatus::Normal
            } else {
                LabStatus::Low
            },
        },
        LabValue {
            name: "MCV",
            value: format!("{} fL", input.mcv),
            status: if (80.0..=100.0).contains(&input.mcv) {
                LabStatus::Normal
            } else if input.mcv < 80.0 {
                LabStatus::Low
            } else {
                LabStatus::High
            },
        },
        LabValue {
            name: "Ferritin",
            value: format!("{} ng/mL", input.ferritin),
            status: if input.ferritin >= 15.0 {
                LabStatus::Normal
            } else {
                LabStatus::Low
            },
        },
    ]
}
