//! Diabetes risk assessment (simplified rubric).
//!
//! Four factors: fasting glucose, BMI, age, systolic blood pressure.

use serde::Serialize;

use super::{map_bucket, AssessmentForm, ConfidenceBand, ScoreCard};

#[derive(Debug, Clone, Default)]
pub struct DiabetesInput {
    /// Fasting blood glucose, mg/dL.
    pub glucose: f64,
    pub bmi: f64,
    pub age: u32,
    /// Systolic blood pressure, mmHg.
    pub blood_pressure: f64,
}

impl DiabetesInput {
    pub fn from_form(form: &AssessmentForm) -> Self {
        Self {
            glucose: form.number("glucose"),
            bmi: form.number("bmi"),
            age: form.count("age"),
            blood_pressure: form.number("blood_pressure"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiabetesAssessment {
    pub risk: RiskLevel,
    pub confidence: u8,
    pub recommendations: Vec<&'static str>,
    pub key_factors: Vec<&'static str>,
}

const CONFIDENCE_HIGH: ConfidenceBand = ConfidenceBand::new(85, 10, 95);
const CONFIDENCE_MEDIUM: ConfidenceBand = ConfidenceBand::new(75, 15, 90);
const CONFIDENCE_LOW: ConfidenceBand = ConfidenceBand::new(80, 15, 95);

/// Score a diabetes input record. Pure and deterministic.
pub fn assess(input: &DiabetesInput) -> DiabetesAssessment {
    let mut card = ScoreCard::new();

    card.grade_above_named(
        input.glucose,
        &[
            (140.0, 3, "Elevated glucose levels"),
            (100.0, 1, "Borderline glucose levels"),
        ],
    );
    card.grade_above_named(
        input.bmi,
        &[(30.0, 2, "Obesity (BMI > 30)"), (25.0, 1, "Overweight (BMI > 25)")],
    );
    if input.age > 45 {
        card.add_factor(1, "Age over 45");
    }
    if input.blood_pressure > 140.0 {
        card.add_factor(1, "High blood pressure");
    }

    let score = card.total();
    let risk = map_bucket(score, &[(4, RiskLevel::High), (2, RiskLevel::Medium)], RiskLevel::Low);
    let confidence = match risk {
        RiskLevel::High => CONFIDENCE_HIGH,
        RiskLevel::Medium => CONFIDENCE_MEDIUM,
        RiskLevel::Low => CONFIDENCE_LOW,
    }
    .rate(score);

    let mut recommendations = vec![match risk {
        RiskLevel::High => "Consult an endocrinologist immediately for comprehensive evaluation",
        RiskLevel::Medium => "Schedule regular check-ups with your healthcare provider",
        RiskLevel::Low => "Maintain current healthy lifestyle habits",
    }];
    recommendations.extend([
        "Follow a balanced diet with controlled carbohydrate intake",
        "Engage in regular physical exercise (150 minutes per week)",
        "Monitor blood sugar levels regularly",
        "Maintain a healthy weight through diet and exercise",
    ]);
    recommendations.truncate(if risk == RiskLevel::High { 5 } else { 4 });

    let key_factors = if card.factors().is_empty() {
        vec!["Normal range values detected"]
    } else {
        card.into_factors()
    };

    DiabetesAssessment {
        risk,
        confidence,
        recommendations,
        key_factors,
    }
}
