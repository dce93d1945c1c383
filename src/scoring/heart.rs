//! Cardiovascular disease risk assessment.
//!
//! Rubric over demographics, resting vitals, cholesterol, chest pain type
//! and exercise response. Buckets: high ≥ 15, moderate ≥ 8, else low.

use serde::Serialize;

use crate::models::{ChestPainType, Sex};

use super::{map_bucket, AssessmentForm, ConfidenceBand, ScoreCard};

#[derive(Debug, Clone, Default)]
pub struct HeartInput {
    pub age: u32,
    pub sex: Option<Sex>,
    pub chest_pain: Option<ChestPainType>,
    /// Resting systolic blood pressure, mmHg.
    pub resting_bp: u32,
    /// Serum cholesterol, mg/dL.
    pub cholesterol: u32,
    /// Fasting blood sugar > 120 mg/dL.
    pub fasting_bs: bool,
    /// Maximum heart rate achieved, bpm.
    pub max_hr: u32,
    pub exercise_angina: bool,
    /// ST depression induced by exercise relative to rest.
    pub oldpeak: f64,
}

impl HeartInput {
    pub fn from_form(form: &AssessmentForm) -> Self {
        Self {
            age: form.count("age"),
            sex: form.choice("sex"),
            chest_pain: form.choice("chest_pain"),
            resting_bp: form.count("resting_bp"),
            cholesterol: form.count("cholesterol"),
            fasting_bs: form.flag("fasting_bs"),
            max_hr: form.count("max_hr"),
            exercise_angina: form.flag("exercise_angina"),
            oldpeak: form.number("oldpeak"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeartAssessment {
    pub risk: RiskLevel,
    pub confidence: u8,
    pub recommendations: Vec<&'static str>,
}

const CONFIDENCE_HIGH: ConfidenceBand = ConfidenceBand::new(85, 10, 95);
const CONFIDENCE_MODERATE: ConfidenceBand = ConfidenceBand::new(75, 15, 90);
const CONFIDENCE_LOW: ConfidenceBand = ConfidenceBand::new(70, 20, 90);

/// Score a cardiovascular input record. Pure and deterministic.
pub fn assess(input: &HeartInput) -> HeartAssessment {
    let mut card = ScoreCard::new();

    card.grade_above(input.age as f64, &[(60.0, 3), (45.0, 2), (35.0, 1)]);
    if input.sex == Some(Sex::Male) {
        card.add(1);
    }
    card.grade_above(input.resting_bp as f64, &[(140.0, 3), (120.0, 2)]);
    card.grade_above(input.cholesterol as f64, &[(240.0, 3), (200.0, 2)]);
    if input.fasting_bs {
        card.add(2);
    }
    card.add(match input.chest_pain {
        Some(ChestPainType::Asymptomatic) => 3,
        Some(ChestPainType::NonAnginal) => 2,
        Some(ChestPainType::AtypicalAngina) => 1,
        _ => 0,
    });
    card.grade_below(input.max_hr as f64, &[(100.0, 2), (150.0, 1)]);
    if input.exercise_angina {
        card.add(2);
    }
    card.grade_above(input.oldpeak, &[(2.0, 3), (1.0, 2), (0.0, 1)]);

    let score = card.total();
    let risk = map_bucket(
        score,
        &[(15, RiskLevel::High), (8, RiskLevel::Moderate)],
        RiskLevel::Low,
    );
    let confidence = match risk {
        RiskLevel::High => CONFIDENCE_HIGH,
        RiskLevel::Moderate => CONFIDENCE_MODERATE,
        RiskLevel::Low => CONFIDENCE_LOW,
    }
    .rate(score);

    HeartAssessment {
        risk,
        confidence,
        recommendations: recommendations_for(risk),
    }
}

fn recommendations_for(risk: RiskLevel) -> Vec<&'static str> {
    match risk {
        RiskLevel::High => vec![
            "Immediate consultation with cardiologist recommended",
            "Consider stress test and ECG evaluation",
            "Start cardiac medication as prescribed",
            "Adopt heart-healthy diet (low sodium, low saturated fat)",
            "Begin supervised exercise program",
            "Monitor blood pressure daily",
            "Quit smoking and limit alcohol consumption",
        ],
        RiskLevel::Moderate => vec![
            "Schedule regular check-ups with your doctor",
            "Monitor blood pressure and cholesterol levels",
            "Maintain healthy weight through diet and exercise",
            "Include 30 minutes of moderate exercise daily",
            "Follow Mediterranean or DASH diet",
            "Manage stress through relaxation techniques",
            "Get adequate sleep (7-9 hours nightly)",
        ],
        RiskLevel::Low => vec![
            "Continue maintaining healthy lifestyle",
            "Regular cardiovascular exercise 3-4 times per week",
            "Eat plenty of fruits, vegetables, and whole grains",
            "Maintain healthy weight and BMI",
            "Annual health check-ups recommended",
            "Stay hydrated and limit processed foods",
            "Practice stress management techniques",
        ],
    }
}
