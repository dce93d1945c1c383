//! Chronic kidney disease risk assessment.
//!
//! Rubric over renal labs (creatinine, urea, urine albumin grade),
//! urinalysis findings, comorbidities, symptoms and electrolytes.
//! Buckets: high ≥ 20, moderate ≥ 12, mild ≥ 6, else normal.

use serde::Serialize;

use crate::models::{Appetite, UrineFinding};

use super::{map_bucket, AssessmentForm, ConfidenceBand, ScoreCard};

#[derive(Debug, Clone, Default)]
pub struct KidneyInput {
    pub age: u32,
    /// Systolic blood pressure, mmHg.
    pub blood_pressure: u32,
    /// Serum creatinine, mg/dL.
    pub serum_creatinine: f64,
    /// Blood urea, mg/dL.
    pub blood_urea: f64,
    /// Urine albumin dipstick grade, 0–5.
    pub albumin_grade: u8,
    pub red_blood_cells: Option<UrineFinding>,
    pub pus_cells: Option<UrineFinding>,
    pub hypertension: bool,
    pub diabetes_mellitus: bool,
    pub coronary_artery_disease: bool,
    pub appetite: Option<Appetite>,
    pub pedal_edema: bool,
    pub anemia: bool,
    /// Hemoglobin, g/dL.
    pub haemoglobin: f64,
    /// Serum sodium, mEq/L.
    pub sodium: f64,
    /// Serum potassium, mEq/L.
    pub potassium: f64,
}

impl KidneyInput {
    pub fn from_form(form: &AssessmentForm) -> Self {
        Self {
            age: form.count("age"),
            blood_pressure: form.count("blood_pressure"),
            serum_creatinine: form.number("serum_creatinine"),
            blood_urea: form.number("blood_urea"),
            albumin_grade: form.count("albumin_grade").min(5) as u8,
            red_blood_cells: form.choice("red_blood_cells"),
            pus_cells: form.choice("pus_cells"),
            hypertension: form.flag("hypertension"),
            diabetes_mellitus: form.flag("diabetes_mellitus"),
            coronary_artery_disease: form.flag("coronary_artery_disease"),
            appetite: form.choice("appetite"),
            pedal_edema: form.flag("pedal_edema"),
            anemia: form.flag("anemia"),
            haemoglobin: form.number("haemoglobin"),
            sodium: form.number("sodium"),
            potassium: form.number("potassium"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Normal,
    Mild,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal Function",
            Self::Mild => "Mild Impairment",
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
pub struct KidneyAssessment {
    pub risk: RiskLevel,
    pub confidence: u8,
    pub recommendations: Vec<&'static str>,
}

const CONFIDENCE_HIGH: ConfidenceBand = ConfidenceBand::new(85, 10, 95);
const CONFIDENCE_MODERATE: ConfidenceBand = ConfidenceBand::new(75, 15, 90);
const CONFIDENCE_MILD: ConfidenceBand = ConfidenceBand::new(70, 20, 90);
const CONFIDENCE_NORMAL: ConfidenceBand = ConfidenceBand::new(80, 15, 95);

/// Score a kidney input record. Pure and deterministic.
pub fn assess(input: &KidneyInput) -> KidneyAssessment {
    let mut card = ScoreCard::new();

    card.grade_above(input.age as f64, &[(70.0, 3), (60.0, 2), (50.0, 1)]);
    card.grade_above(input.blood_pressure as f64, &[(140.0, 3), (120.0, 2)]);
    card.grade_above(input.serum_creatinine, &[(1.5, 4), (1.2, 3), (1.0, 2)]);
    card.grade_above(input.blood_urea, &[(50.0, 3), (40.0, 2), (30.0, 1)]);

    card.add(match input.albumin_grade {
        4 | 5 => 4,
        3 => 3,
        2 => 2,
        1 => 1,
        _ => 0,
    });

    if input.red_blood_cells == Some(UrineFinding::Abnormal) {
        card.add(2);
    }
    if input.pus_cells == Some(UrineFinding::Abnormal) {
        card.add(2);
    }

    if input.hypertension {
        card.add(2);
    }
    if input.diabetes_mellitus {
        card.add(3);
    }
    if input.coronary_artery_disease {
        card.add(2);
    }

    if input.appetite == Some(Appetite::Poor) {
        card.add(2);
    }
    if input.pedal_edema {
        card.add(3);
    }
    if input.anemia {
        card.add(2);
    }

    card.grade_below(input.haemoglobin, &[(10.0, 3), (12.0, 2)]);

    // Electrolytes score only when measured.
    if input.sodium > 0.0 && !(135.0..=145.0).contains(&input.sodium) {
        card.add(2);
    }
    if input.potassium > 0.0 && !(3.5..=5.0).contains(&input.potassium) {
        card.add(2);
    }

    let score = card.total();
    let risk = map_bucket(
        score,
        &[
            (20, RiskLevel::High),
            (12, RiskLevel::Moderate),
            (6, RiskLevel::Mild),
        ],
        RiskLevel::Normal,
    );
    let confidence = match risk {
        RiskLevel::High => CONFIDENCE_HIGH,
        RiskLevel::Moderate => CONFIDENCE_MODERATE,
        RiskLevel::Mild => CONFIDENCE_MILD,
        RiskLevel::Normal => CONFIDENCE_NORMAL,
    }
    .rate(score);

    KidneyAssessment {
        risk,
        confidence,
        recommendations: recommendations_for(risk),
    }
}

fn recommendations_for(risk: RiskLevel) -> Vec<&'static str> {
    match risk {
        RiskLevel::High => vec![
            "Immediate nephrology consultation required",
            "Consider dialysis preparation if GFR <15",
            "Strict dietary protein restriction (0.6-0.8g/kg)",
            "Monitor fluid intake and electrolyte balance",
            "Regular kidney function tests (weekly)",
            "Blood pressure control <130/80 mmHg",
            "Avoid nephrotoxic medications",
        ],
        RiskLevel::Moderate => vec![
            "Regular monitoring by nephrologist",
            "Moderate protein restriction (0.8-1.0g/kg)",
            "Control diabetes and hypertension",
            "Monthly kidney function tests",
            "Stay hydrated but avoid fluid overload",
            "Limit sodium intake (<2g per day)",
            "Monitor for complications",
        ],
        RiskLevel::Mild => vec![
            "Bi-annual kidney function screening",
            "Maintain healthy protein intake",
            "Control underlying conditions",
            "Regular blood pressure monitoring",
            "Stay well hydrated (8-10 glasses water)",
            "Limit processed foods and excess salt",
            "Regular exercise as tolerated",
        ],
        RiskLevel::Normal => vec![
            "Continue maintaining healthy lifestyle",
            "Annual kidney function screening",
            "Maintain adequate hydration",
            "Regular exercise and healthy diet",
            "Monitor blood pressure regularly",
            "Avoid excessive use of pain medications",
            "Limit alcohol and quit smoking",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_input_is_normal_function() {
        let result = assess(&KidneyInput::default());
        assert_eq!(result.risk, RiskLevel::Normal);
        assert_eq!(result.confidence, 80);
        assert_eq!(result.recommendations.len(), 7);
    }

    #[test]
    fn advanced_ckd_profile_is_high_risk() {
        let input = KidneyInput {
            age: 72,               // +3
            blood_pressure: 150,   // +3
            serum_creatinine: 2.4, // +4
            blood_urea: 65.0,      // +3
            albumin_grade: 4,      // +4
            diabetes_mellitus: true, // +3
            pedal_edema: true,     // +3
            haemoglobin: 9.0,      // +3
            ..Default::default()
        };
        // Total 26
        let result = assess(&input);
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.confidence, 95);
    }

    #[test]
    fn bucket_boundaries() {
        // Score 6 exactly: creatinine 1.6 (+4) + urea 31 (+1) + age 51 (+1)
        let mild = KidneyInput {
            age: 51,
            serum_creatinine: 1.6,
            blood_urea: 31.0,
            ..Default::default()
        };
        assert_eq!(assess(&mild).risk, RiskLevel::Mild);

        // Score 5: drop the age point
        let normal = KidneyInput {
            age: 50,
            serum_creatinine: 1.6,
            blood_urea: 31.0,
            ..Default::default()
        };
        assert_eq!(assess(&normal).risk, RiskLevel::Normal);

        // Score 12 exactly → moderate
        let moderate = KidneyInput {
            age: 51,             // +1
            serum_creatinine: 1.6, // +4
            blood_urea: 31.0,    // +1
            albumin_grade: 1,    // +1
            hypertension: true,  // +2
            diabetes_mellitus: true, // +3
            ..Default::default()
        };
        assert_eq!(assess(&moderate).risk, RiskLevel::Moderate);
    }

    #[test]
    fn albumin_grades_four_and_five_weigh_the_same() {
        let grade = |albumin_grade| {
            assess(&KidneyInput {
                albumin_grade,
                serum_creatinine: 1.3, // +3 so grade 4 lands in mild
                ..Default::default()
            })
            .risk
        };
        assert_eq!(grade(4), grade(5));
        assert_eq!(grade(4), RiskLevel::Mild); // 4 + 3 = 7
        assert_eq!(grade(2), RiskLevel::Normal); // 2 + 3 = 5
    }

    #[test]
    fn electrolytes_score_only_when_measured() {
        let unmeasured = assess(&KidneyInput::default());
        assert_eq!(unmeasured.risk, RiskLevel::Normal);

        let imbalanced = KidneyInput {
            sodium: 130.0,   // +2
            potassium: 5.6,  // +2
            blood_urea: 31.0, // +1
            age: 51,         // +1
            ..Default::default()
        };
        // 6 → mild
        assert_eq!(assess(&imbalanced).risk, RiskLevel::Mild);

        let in_range = KidneyInput {
            sodium: 140.0,
            potassium: 4.2,
            ..Default::default()
        };
        assert_eq!(assess(&in_range).risk, RiskLevel::Normal);
    }

    #[test]
    fn urine_findings_require_abnormal_selection() {
        let normal_finding = KidneyInput {
            red_blood_cells: Some(UrineFinding::Normal),
            pus_cells: Some(UrineFinding::Normal),
            ..Default::default()
        };
        assert_eq!(assess(&normal_finding).risk, RiskLevel::Normal);

        let abnormal = KidneyInput {
            red_blood_cells: Some(UrineFinding::Abnormal),
            pus_cells: Some(UrineFinding::Abnormal),
            appetite: Some(Appetite::Poor),
            ..Default::default()
        };
        // 2 + 2 + 2 = 6 → mild
        assert_eq!(assess(&abnormal).risk, RiskLevel::Mild);
    }

    #[test]
    fn from_form_caps_albumin_grade() {
        let mut form = AssessmentForm::new();
        form.set("albumin_grade", "9");
        let input = KidneyInput::from_form(&form);
        assert_eq!(input.albumin_grade, 5);
    }
}
