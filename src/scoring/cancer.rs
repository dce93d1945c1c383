//! Overall cancer risk assessment and screening recommendations.
//!
//! The only rubric with protective factors: regular or high physical
//! activity and an excellent diet subtract points, so the total can go
//! negative. Matched rules also name the risk factor and, where relevant,
//! suggest a screening test. Buckets: very high ≥ 18, high ≥ 12,
//! moderate ≥ 7, low ≥ 3, else very low.

use serde::Serialize;

use crate::models::{
    ActivityLevel, AlcoholUse, DietQuality, ExposureLevel, FamilyHistoryStrength,
    MedicalHistoryRisk, ReproductiveHistory, Severity, Sex, SmokingHistory, SunExposure,
    VaccinationStatus,
};

use super::{map_bucket, AssessmentForm, ConfidenceBand, ScoreCard};

#[derive(Debug, Clone, Default)]
pub struct CancerInput {
    pub age: u32,
    pub sex: Option<Sex>,
    pub bmi: f64,
    pub smoking: Option<SmokingHistory>,
    pub alcohol: Option<AlcoholUse>,
    pub family_history: Option<FamilyHistoryStrength>,
    pub physical_activity: Option<ActivityLevel>,
    pub diet_quality: Option<DietQuality>,
    pub sun_exposure: Option<SunExposure>,
    pub occupational_exposure: Option<ExposureLevel>,
    pub medical_history: Option<MedicalHistoryRisk>,
    pub reproductive_history: Option<ReproductiveHistory>,
    pub vaccination: Option<VaccinationStatus>,
    pub chronic_inflammation: Option<Severity>,
    pub previous_cancer: bool,
}

impl CancerInput {
    pub fn from_form(form: &AssessmentForm) -> Self {
        Self {
            age: form.count("age"),
            sex: form.choice("sex"),
            bmi: form.number("bmi"),
            smoking: form.choice("smoking"),
            alcohol: form.choice("alcohol"),
            family_history: form.choice("family_history"),
            physical_activity: form.choice("physical_activity"),
            diet_quality: form.choice("diet_quality"),
            sun_exposure: form.choice("sun_exposure"),
            occupational_exposure: form.choice("occupational_exposure"),
            medical_history: form.choice("medical_history"),
            reproductive_history: form.choice("reproductive_history"),
            vaccination: form.choice("vaccination"),
            chronic_inflammation: form.choice("chronic_inflammation"),
            previous_cancer: form.flag("previous_cancer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low Risk",
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
            Self::VeryHigh => "Very High Risk",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CancerAssessment {
    pub risk: RiskLevel,
    pub confidence: u8,
    pub recommendations: Vec<&'static str>,
    /// Named factors from matched rules, deduplicated, at most 6.
    pub risk_factors: Vec<&'static str>,
    /// Suggested screening tests, deduplicated, at most 6.
    pub screening_tests: Vec<&'static str>,
}

const CONFIDENCE_VERY_HIGH: ConfidenceBand = ConfidenceBand::new(85, 10, 95);
const CONFIDENCE_HIGH: ConfidenceBand = ConfidenceBand::new(80, 15, 95);
const CONFIDENCE_MODERATE: ConfidenceBand = ConfidenceBand::new(75, 20, 95);
const CONFIDENCE_LOW: ConfidenceBand = ConfidenceBand::new(70, 25, 95);
const CONFIDENCE_VERY_LOW: ConfidenceBand = ConfidenceBand::new(75, 20, 95);

fn suggest(tests: &mut Vec<&'static str>, names: &[&'static str]) {
    for name in names {
        if !tests.contains(name) {
            tests.push(name);
        }
    }
}

/// Score a cancer risk input record. Pure and deterministic.
pub fn assess(input: &CancerInput) -> CancerAssessment {
    let mut card = ScoreCard::new();
    let mut screening: Vec<&'static str> = Vec::new();

    // Age is the strongest risk factor.
    card.grade_at_least_named(
        input.age as f64,
        &[
            (70.0, 5, "Advanced age (≥70)"),
            (60.0, 4, "Older age (60-69)"),
            (50.0, 3, "Middle age (50-59)"),
            (40.0, 2, "Age over 40"),
        ],
    );

    // Sex-specific screening and reproductive risk.
    match input.sex {
        Some(Sex::Female) => {
            suggest(&mut screening, &["Mammography (40+)", "Cervical screening (21+)"]);
            if input.reproductive_history == Some(ReproductiveHistory::HighRisk) {
                card.add_factor(2, "High-risk reproductive factors");
            }
        }
        Some(Sex::Male) => {
            suggest(&mut screening, &["Prostate screening (50+)"]);
        }
        None => {}
    }

    // Smoking is the strongest modifiable risk factor.
    match input.smoking {
        Some(SmokingHistory::HeavyCurrent) => {
            card.add_factor(6, "Heavy current smoking");
            suggest(&mut screening, &["Low-dose CT (lung)", "Head & neck examination"]);
        }
        Some(SmokingHistory::Current) => {
            card.add_factor(4, "Current smoking");
            suggest(&mut screening, &["Lung screening"]);
        }
        Some(SmokingHistory::FormerHeavy) => {
            card.add_factor(3, "Former heavy smoker");
            suggest(&mut screening, &["Lung screening"]);
        }
        Some(SmokingHistory::Former) => {
            card.add_factor(2, "Former smoker");
        }
        _ => {}
    }

    match input.alcohol {
        Some(AlcoholUse::Heavy) => {
            card.add_factor(3, "Heavy alcohol use");
            suggest(&mut screening, &["Liver imaging", "Upper endoscopy"]);
        }
        Some(AlcoholUse::Moderate) => {
            card.add_factor(1, "Moderate alcohol use");
        }
        _ => {}
    }

    match input.family_history {
        Some(FamilyHistoryStrength::Strong) => {
            card.add_factor(4, "Strong family history");
            suggest(&mut screening, &["Genetic counseling", "Enhanced screening"]);
        }
        Some(FamilyHistoryStrength::Moderate) => {
            card.add_factor(2, "Family history present");
            suggest(&mut screening, &["Earlier screening"]);
        }
        _ => {}
    }

    card.grade_at_least_named(
        input.bmi,
        &[
            (35.0, 3, "Severe obesity (BMI ≥35)"),
            (30.0, 2, "Obesity (BMI 30-35)"),
            (25.0, 1, "Overweight (BMI 25-30)"),
        ],
    );

    // Physical activity is the main protective factor.
    match input.physical_activity {
        Some(ActivityLevel::None) => card.add_factor(2, "Sedentary lifestyle"),
        Some(ActivityLevel::Minimal) => card.add_factor(1, "Insufficient physical activity"),
        Some(ActivityLevel::Regular) => card.credit(1),
        Some(ActivityLevel::High) => card.credit(2),
        None => {}
    }

    match input.diet_quality {
        Some(DietQuality::Poor) => card.add_factor(2, "Poor diet quality"),
        Some(DietQuality::Average) => card.add(1),
        Some(DietQuality::Excellent) => card.credit(1),
        _ => {}
    }

    match input.sun_exposure {
        Some(SunExposure::Excessive) => {
            card.add_factor(2, "Excessive sun exposure");
            suggest(&mut screening, &["Dermatology screening"]);
        }
        Some(SunExposure::Moderate) => {
            card.add(1);
            suggest(&mut screening, &["Annual skin check"]);
        }
        _ => {}
    }

    match input.occupational_exposure {
        Some(ExposureLevel::High) => {
            card.add_factor(3, "High occupational exposure");
            suggest(&mut screening, &["Occupational health screening"]);
        }
        Some(ExposureLevel::Moderate) => {
            card.add_factor(1, "Moderate occupational exposure");
        }
        _ => {}
    }

    match input.medical_history {
        Some(MedicalHistoryRisk::HighRisk) => {
            card.add_factor(3, "High-risk medical conditions");
            suggest(&mut screening, &["Targeted screening"]);
        }
        Some(MedicalHistoryRisk::ModerateRisk) => {
            card.add_factor(1, "Some risk conditions");
        }
        _ => {}
    }

    if input.vaccination == Some(VaccinationStatus::Incomplete) {
        card.add_factor(1, "Incomplete vaccinations");
    }

    match input.chronic_inflammation {
        Some(Severity::Severe) => card.add_factor(2, "Severe chronic inflammation"),
        Some(Severity::Moderate) => card.add_factor(1, "Chronic inflammatory condition"),
        _ => {}
    }

    if input.previous_cancer {
        card.add_factor(4, "Previous cancer history");
        suggest(&mut screening, &["Enhanced surveillance"]);
    }

    // Standard age-triggered screenings.
    if input.age >= 50 {
        suggest(&mut screening, &["Colonoscopy"]);
    }
    if input.age >= 45 {
        suggest(&mut screening, &["Annual physical exam"]);
    }

    let score = card.total();
    let risk = map_bucket(
        score,
        &[
            (18, RiskLevel::VeryHigh),
            (12, RiskLevel::High),
            (7, RiskLevel::Moderate),
            (3, RiskLevel::Low),
        ],
        RiskLevel::VeryLow,
    );
    let confidence = match risk {
        RiskLevel::VeryHigh => CONFIDENCE_VERY_HIGH,
        RiskLevel::High => CONFIDENCE_HIGH,
        RiskLevel::Moderate => CONFIDENCE_MODERATE,
        RiskLevel::Low => CONFIDENCE_LOW,
        RiskLevel::VeryLow => CONFIDENCE_VERY_LOW,
    }
    .rate(score);

    let mut risk_factors = card.into_factors();
    risk_factors.dedup();
    risk_factors.truncate(6);
    screening.truncate(6);

    CancerAssessment {
        risk,
        confidence,
        recommendations: recommendations_for(risk),
        risk_factors,
        screening_tests: screening,
    }
}

fn recommendations_for(risk: RiskLevel) -> Vec<&'static str> {
    match risk {
        RiskLevel::VeryHigh => vec![
            "Immediate oncology consultation required",
            "Comprehensive genetic counseling and testing",
            "Enhanced multi-organ screening program",
            "Consider preventive interventions where appropriate",
            "Aggressive lifestyle modification program",
            "Regular monitoring every 3-6 months",
            "Participation in high-risk screening protocols",
            "Consider chemoprevention if eligible",
        ],
        RiskLevel::High => vec![
            "Consultation with oncologist or genetic counselor",
            "Accelerated and enhanced screening protocols",
            "Annual comprehensive cancer screening",
            "Immediate smoking cessation if applicable",
            "Weight management and dietary counseling",
            "Consider preventive medications where indicated",
            "Regular follow-up every 6 months",
            "Family screening recommendations",
        ],
        RiskLevel::Moderate => vec![
            "Follow standard cancer screening guidelines",
            "Annual health check-ups with primary physician",
            "Lifestyle modification program",
            "Age-appropriate cancer screening tests",
            "Maintain healthy weight and diet",
            "Regular physical activity (150 min/week)",
            "Limit alcohol consumption",
            "Annual skin and self-examinations",
        ],
        RiskLevel::Low => vec![
            "Continue healthy lifestyle practices",
            "Follow routine screening recommendations",
            "Maintain regular physical activity",
            "Healthy diet rich in fruits and vegetables",
            "Limit processed foods and red meat",
            "Avoid tobacco and limit alcohol",
            "Sun protection and skin awareness",
            "Biennial health check-ups",
        ],
        RiskLevel::VeryLow => vec![
            "Excellent! Continue current healthy practices",
            "Maintain optimal weight and fitness level",
            "Continue nutritious, balanced diet",
            "Regular exercise and stress management",
            "Follow age-appropriate screening only",
            "Sun safety and skin protection",
            "Avoid known carcinogens",
            "Health check-ups every 2-3 years",
        ],
    }
}
