//! Respiratory health assessment and COPD screening.
//!
//! The widest rubric of the seven: smoking exposure, graded symptoms,
//! vitals, peak flow against an age/sex-expected value and imaging. Rules
//! that match also suggest possible conditions for the result panel.
//! Buckets: high ≥ 20, moderate ≥ 12, mild ≥ 6, else healthy.

use serde::Serialize;

use crate::models::{
    ExposureLevel, Severity, Sex, SmokingStatus, WeightLossLevel, WheezeFrequency, XrayFinding,
};

use super::{map_bucket, AssessmentForm, ConfidenceBand, ScoreCard};

#[derive(Debug, Clone, Default)]
pub struct LungInput {
    pub age: u32,
    pub sex: Option<Sex>,
    pub smoking: Option<SmokingStatus>,
    /// Packs per day × years smoked.
    pub pack_years: f64,
    pub chronic_cough: Option<Severity>,
    pub shortness_of_breath: Option<Severity>,
    pub chest_pain: Option<Severity>,
    pub wheezing: Option<WheezeFrequency>,
    pub weight_loss: Option<WeightLossLevel>,
    /// Breaths per minute.
    pub respiratory_rate: u32,
    /// SpO2, %.
    pub oxygen_saturation: f64,
    /// Peak expiratory flow, L/min.
    pub peak_flow: f64,
    pub chest_xray: Option<XrayFinding>,
    pub family_history: bool,
    pub occupational_exposure: Option<ExposureLevel>,
    pub allergies: Option<Severity>,
}

impl LungInput {
    pub fn from_form(form: &AssessmentForm) -> Self {
        Self {
            age: form.count("age"),
            sex: form.choice("sex"),
            smoking: form.choice("smoking"),
            pack_years: form.number("pack_years"),
            chronic_cough: form.choice("chronic_cough"),
            shortness_of_breath: form.choice("shortness_of_breath"),
            chest_pain: form.choice("chest_pain"),
            wheezing: form.choice("wheezing"),
            weight_loss: form.choice("weight_loss"),
            respiratory_rate: form.count("respiratory_rate"),
            oxygen_saturation: form.number("oxygen_saturation"),
            peak_flow: form.number("peak_flow"),
            chest_xray: form.choice("chest_xray"),
            family_history: form.flag("family_history"),
            occupational_exposure: form.choice("occupational_exposure"),
            allergies: form.choice("allergies"),
        }
    }

    /// Expected peak flow for age and sex, L/min.
    pub fn expected_peak_flow(&self) -> f64 {
        match (self.sex, self.age < 40) {
            (Some(Sex::Male), true) => 600.0,
            (Some(Sex::Male), false) => 500.0,
            (_, true) => 450.0,
            (_, false) => 380.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Healthy,
    Mild,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy Lungs",
            Self::Mild => "Mild Risk",
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
pub struct LungAssessment {
    pub risk: RiskLevel,
    pub confidence: u8,
    pub recommendations: Vec<&'static str>,
    /// Conditions suggested by the matched rules, deduplicated, at most 4.
    pub possible_conditions: Vec<&'static str>,
}

const CONFIDENCE_HIGH: ConfidenceBand = ConfidenceBand::new(85, 10, 95);
const CONFIDENCE_MODERATE: ConfidenceBand = ConfidenceBand::new(75, 15, 90);
const CONFIDENCE_MILD: ConfidenceBand = ConfidenceBand::new(70, 20, 90);
const CONFIDENCE_HEALTHY: ConfidenceBand = ConfidenceBand::new(80, 15, 95);

fn suggest(conditions: &mut Vec<&'static str>, names: &[&'static str]) {
    for name in names {
        if !conditions.contains(name) {
            conditions.push(name);
        }
    }
}

/// Score a respiratory input record. Pure and deterministic.
pub fn assess(input: &LungInput) -> LungAssessment {
    let mut card = ScoreCard::new();
    let mut conditions: Vec<&'static str> = Vec::new();

    card.grade_above(input.age as f64, &[(65.0, 3), (50.0, 2), (40.0, 1)]);

    match input.smoking {
        Some(SmokingStatus::Current) => {
            card.add(5);
            suggest(&mut conditions, &["COPD", "Lung Cancer Risk", "Emphysema"]);
        }
        Some(SmokingStatus::Former) => {
            card.add(3);
            suggest(&mut conditions, &["COPD Risk", "Residual Damage"]);
        }
        _ => {}
    }
    card.grade_above(input.pack_years, &[(30.0, 4), (20.0, 3), (10.0, 2)]);

    match input.chronic_cough {
        Some(Severity::Severe) => {
            card.add(3);
            suggest(&mut conditions, &["Chronic Bronchitis", "COPD"]);
        }
        Some(Severity::Moderate) => card.add(2),
        Some(Severity::Mild) => card.add(1),
        _ => {}
    }

    match input.shortness_of_breath {
        Some(Severity::Severe) => {
            card.add(4);
            suggest(&mut conditions, &["Asthma", "COPD", "Pulmonary Embolism"]);
        }
        Some(Severity::Moderate) => {
            card.add(2);
            suggest(&mut conditions, &["Exercise Intolerance", "Mild Asthma"]);
        }
        Some(Severity::Mild) => card.add(1),
        _ => {}
    }

    match input.chest_pain {
        Some(Severity::Severe) => {
            card.add(3);
            suggest(&mut conditions, &["Pneumonia", "Pleuritis", "Pulmonary Embolism"]);
        }
        Some(Severity::Moderate) => card.add(2),
        _ => {}
    }

    match input.wheezing {
        Some(WheezeFrequency::Frequent) => {
            card.add(3);
            suggest(&mut conditions, &["Asthma", "COPD", "Allergic Bronchitis"]);
        }
        Some(WheezeFrequency::Occasional) => card.add(1),
        _ => {}
    }

    match input.weight_loss {
        Some(WeightLossLevel::Significant) => {
            card.add(4);
            suggest(&mut conditions, &["Lung Cancer", "Advanced COPD", "Tuberculosis"]);
        }
        Some(WeightLossLevel::Moderate) => card.add(2),
        _ => {}
    }

    card.grade_above(input.respiratory_rate as f64, &[(24.0, 3), (20.0, 2)]);
    card.grade_below(input.oxygen_saturation, &[(90.0, 4), (95.0, 3), (98.0, 1)]);

    // Peak flow scores as a percentage of the age/sex-expected value,
    // only once actually measured.
    if input.peak_flow > 0.0 {
        let percentage = input.peak_flow / input.expected_peak_flow() * 100.0;
        if percentage < 50.0 {
            card.add(4);
            suggest(&mut conditions, &["Severe Airway Obstruction", "Acute Asthma"]);
        } else if percentage < 70.0 {
            card.add(3);
            suggest(&mut conditions, &["Moderate Airway Obstruction"]);
        } else if percentage < 80.0 {
            card.add(2);
        }
    }

    match input.chest_xray {
        Some(XrayFinding::Abnormal) => {
            card.add(4);
            suggest(&mut conditions, &["Pneumonia", "Lung Cancer", "Pulmonary Fibrosis"]);
        }
        Some(XrayFinding::Suspicious) => card.add(2),
        _ => {}
    }

    if input.family_history {
        card.add(2);
    }
    match input.occupational_exposure {
        Some(ExposureLevel::High) => {
            card.add(3);
            suggest(&mut conditions, &["Occupational Lung Disease", "Asbestosis"]);
        }
        Some(ExposureLevel::Moderate) => card.add(1),
        _ => {}
    }
    if input.allergies == Some(Severity::Severe) {
        card.add(2);
        suggest(&mut conditions, &["Allergic Asthma", "Hypersensitivity Pneumonitis"]);
    }

    let score = card.total();
    let risk = map_bucket(
        score,
        &[
            (20, RiskLevel::High),
            (12, RiskLevel::Moderate),
            (6, RiskLevel::Mild),
        ],
        RiskLevel::Healthy,
    );
    let confidence = match risk {
        RiskLevel::High => CONFIDENCE_HIGH,
        RiskLevel::Moderate => CONFIDENCE_MODERATE,
        RiskLevel::Mild => CONFIDENCE_MILD,
        RiskLevel::Healthy => CONFIDENCE_HEALTHY,
    }
    .rate(score);

    conditions.truncate(4);

    LungAssessment {
        risk,
        confidence,
        recommendations: recommendations_for(risk),
        possible_conditions: conditions,
    }
}

fn recommendations_for(risk: RiskLevel) -> Vec<&'static str> {
    match risk {
        RiskLevel::High => vec![
            "Immediate pulmonology consultation required",
            "Complete pulmonary function tests (PFTs)",
            "High-resolution CT scan of chest",
            "Consider bronchoscopy if indicated",
            "Immediate smoking cessation if applicable",
            "Oxygen therapy evaluation if hypoxic",
            "Pulmonary rehabilitation program",
            "Regular monitoring for disease progression",
        ],
        RiskLevel::Moderate => vec![
            "Pulmonologist consultation recommended",
            "Spirometry and lung function testing",
            "Chest CT scan if symptoms persist",
            "Smoking cessation program if needed",
            "Bronchodilator therapy trial",
            "Avoid respiratory irritants and pollutants",
            "Annual influenza and pneumonia vaccines",
            "Regular follow-up every 3-6 months",
        ],
        RiskLevel::Mild => vec![
            "Regular monitoring by primary physician",
            "Basic spirometry screening annually",
            "Smoking cessation if applicable",
            "Regular cardiovascular exercise as tolerated",
            "Avoid secondhand smoke and air pollution",
            "Maintain healthy weight",
            "Stay up-to-date with vaccinations",
            "Practice breathing exercises",
        ],
        RiskLevel::Healthy => vec![
            "Continue maintaining excellent lung health",
            "Regular aerobic exercise (30 min, 5x/week)",
            "Avoid smoking and secondhand smoke",
            "Annual health screenings",
            "Practice deep breathing exercises",
            "Maintain good indoor air quality",
            "Stay hydrated and eat antioxidant-rich foods",
            "Get adequate sleep and manage stress",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_input_is_healthy() {
        let result = assess(&LungInput::default());
        assert_eq!(result.risk, RiskLevel::Healthy);
        assert!(result.possible_conditions.is_empty());
        assert_eq!(result.recommendations.len(), 8);
    }

    #[test]
    fn heavy_smoker_with_symptoms_is_high_risk() {
        let input = LungInput {
            age: 66,                                   // +3
            sex: Some(Sex::Male),
            smoking: Some(SmokingStatus::Current),     // +5
            pack_years: 35.0,                          // +4
            chronic_cough: Some(Severity::Severe),     // +3
            shortness_of_breath: Some(Severity::Severe), // +4
            oxygen_saturation: 89.0,                   // +4
            ..Default::default()
        };
        // 23
        let result = assess(&input);
        assert_eq!(result.risk, RiskLevel::High);
        assert!(result.possible_conditions.contains(&"COPD"));
        assert_eq!(result.possible_conditions.len(), 4);
    }

    #[test]
    fn possible_conditions_deduplicate_and_cap_at_four() {
        let input = LungInput {
            smoking: Some(SmokingStatus::Current), // COPD, Lung Cancer Risk, Emphysema
            chronic_cough: Some(Severity::Severe), // Chronic Bronchitis, COPD (dup)
            wheezing: Some(WheezeFrequency::Frequent), // Asthma, COPD (dup), Allergic Bronchitis
            ..Default::default()
        };
        let result = assess(&input);
        assert_eq!(
            result.possible_conditions,
            vec!["COPD", "Lung Cancer Risk", "Emphysema", "Chronic Bronchitis"]
        );
    }

    #[test]
    fn peak_flow_scores_against_expected_value() {
        // Man of 35: expected 600. 280 L/min is 46.7% → +4
        let obstructed = LungInput {
            age: 35,
            sex: Some(Sex::Male),
            peak_flow: 280.0,
            ..Default::default()
        };
        let result = assess(&obstructed);
        assert!(result
            .possible_conditions
            .contains(&"Severe Airway Obstruction"));

        // Same flow for a woman of 55: expected 380 → 73.7% → +2, no condition
        let ok_ish = LungInput {
            age: 55,
            sex: Some(Sex::Female),
            peak_flow: 280.0,
            ..Default::default()
        };
        let result = assess(&ok_ish);
        assert!(!result
            .possible_conditions
            .iter()
            .any(|c| c.contains("Obstruction")));
    }

    #[test]
    fn unmeasured_peak_flow_and_spo2_contribute_nothing() {
        let input = LungInput {
            peak_flow: 0.0,
            oxygen_saturation: 0.0,
            ..Default::default()
        };
        assert_eq!(assess(&input).risk, RiskLevel::Healthy);
    }

    #[test]
    fn spo2_bands() {
        let score_of = |spo2| {
            assess(&LungInput {
                oxygen_saturation: spo2,
                smoking: Some(SmokingStatus::Former), // +3 baseline
                ..Default::default()
            })
            .risk
        };
        assert_eq!(score_of(99.0), RiskLevel::Healthy); // 3
        assert_eq!(score_of(97.0), RiskLevel::Healthy); // 4
        assert_eq!(score_of(93.0), RiskLevel::Mild); // 6
        assert_eq!(score_of(88.0), RiskLevel::Mild); // 7
    }

    #[test]
    fn bucket_boundary_eleven_vs_twelve() {
        // 11: former smoker (+3), pack-years 25 (+3), cough moderate (+2),
        //     occasional wheeze (+1), family history (+2)
        let input = LungInput {
            smoking: Some(SmokingStatus::Former),
            pack_years: 25.0,
            chronic_cough: Some(Severity::Moderate),
            wheezing: Some(WheezeFrequency::Occasional),
            family_history: true,
            ..Default::default()
        };
        assert_eq!(assess(&input).risk, RiskLevel::Mild);

        // +1 (mild breathlessness) → 12 → moderate
        let input = LungInput {
            shortness_of_breath: Some(Severity::Mild),
            ..input
        };
        assert_eq!(assess(&input).risk, RiskLevel::Moderate);
    }

    #[test]
    fn from_form_reads_selects_and_flags() {
        let mut form = AssessmentForm::new();
        form.set("smoking", "current");
        form.set("wheezing", "frequent");
        form.set("family_history", "yes");
        let input = LungInput::from_form(&form);
        assert_eq!(input.smoking, Some(SmokingStatus::Current));
        assert_eq!(input.wheezing, Some(WheezeFrequency::Frequent));
        assert!(input.family_history);
    }
}
