//! Liver function assessment from a standard hepatic panel.
//!
//! Enzyme and bilirubin bands accumulate alongside a secondary AST/ALT
//! ratio classification (ratio > 2 is the alcoholic-liver-disease pattern).
//! Buckets: high ≥ 15, moderate ≥ 10, mild ≥ 5, else normal.

use serde::Serialize;

use super::{map_bucket, AssessmentForm, ConfidenceBand, ScoreCard};

#[derive(Debug, Clone, Default)]
pub struct LiverInput {
    pub age: u32,
    /// Total bilirubin, mg/dL.
    pub total_bilirubin: f64,
    /// Direct (conjugated) bilirubin, mg/dL.
    pub direct_bilirubin: f64,
    /// Alkaline phosphatase, IU/L.
    pub alkaline_phosphatase: f64,
    /// Alanine aminotransferase (ALT), IU/L.
    pub alt: f64,
    /// Aspartate aminotransferase (AST), IU/L.
    pub ast: f64,
    /// Total serum proteins, g/dL.
    pub total_proteins: f64,
    /// Serum albumin, g/dL.
    pub albumin: f64,
    /// Albumin/globulin ratio.
    pub albumin_globulin_ratio: f64,
}

impl LiverInput {
    pub fn from_form(form: &AssessmentForm) -> Self {
        Self {
            age: form.count("age"),
            total_bilirubin: form.number("total_bilirubin"),
            direct_bilirubin: form.number("direct_bilirubin"),
            alkaline_phosphatase: form.number("alkaline_phosphatase"),
            alt: form.number("alt"),
            ast: form.number("ast"),
            total_proteins: form.number("total_proteins"),
            albumin: form.number("albumin"),
            albumin_globulin_ratio: form.number("albumin_globulin_ratio"),
        }
    }

    /// AST/ALT ratio; undefined until ALT is measured.
    pub fn ast_alt_ratio(&self) -> Option<f64> {
        (self.alt > 0.0).then(|| self.ast / self.alt)
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
            Self::Mild => "Mild Dysfunction",
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
pub struct LiverAssessment {
    pub risk: RiskLevel,
    pub confidence: u8,
    /// AST/ALT ratio when both transaminases were measured.
    pub ast_alt_ratio: Option<f64>,
    pub recommendations: Vec<&'static str>,
}

const CONFIDENCE_HIGH: ConfidenceBand = ConfidenceBand::new(85, 10, 95);
const CONFIDENCE_MODERATE: ConfidenceBand = ConfidenceBand::new(75, 15, 90);
const CONFIDENCE_MILD: ConfidenceBand = ConfidenceBand::new(70, 20, 90);
const CONFIDENCE_NORMAL: ConfidenceBand = ConfidenceBand::new(80, 15, 95);

/// Transaminase bands shared by ALT and AST (normal tops out near 40 IU/L).
const TRANSAMINASE_BANDS: [(f64, i32); 4] = [(200.0, 4), (100.0, 3), (80.0, 2), (40.0, 1)];

/// Score a liver panel. Pure and deterministic.
pub fn assess(input: &LiverInput) -> LiverAssessment {
    let mut card = ScoreCard::new();

    card.grade_above(input.age as f64, &[(65.0, 2), (50.0, 1)]);
    card.grade_above(input.total_bilirubin, &[(3.0, 4), (2.0, 3), (1.2, 2)]);
    card.grade_above(input.direct_bilirubin, &[(1.0, 3), (0.5, 2), (0.3, 1)]);
    card.grade_above(input.alkaline_phosphatase, &[(300.0, 3), (200.0, 2), (147.0, 1)]);
    card.grade_above(input.alt, &TRANSAMINASE_BANDS);
    card.grade_above(input.ast, &TRANSAMINASE_BANDS);

    let ratio = input.ast_alt_ratio();
    if let Some(ratio) = ratio {
        card.grade_above(ratio, &[(2.0, 2), (1.5, 1)]);
    }

    card.grade_below(input.total_proteins, &[(6.0, 2)]);
    if input.total_proteins > 8.5 {
        card.add(1);
    }
    card.grade_below(input.albumin, &[(3.0, 3), (3.5, 2)]);
    card.grade_below(input.albumin_globulin_ratio, &[(1.0, 2)]);
    if input.albumin_globulin_ratio > 2.5 {
        card.add(1);
    }

    let score = card.total();
    let risk = map_bucket(
        score,
        &[
            (15, RiskLevel::High),
            (10, RiskLevel::Moderate),
            (5, RiskLevel::Mild),
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

    LiverAssessment {
        risk,
        confidence,
        ast_alt_ratio: ratio,
        recommendations: recommendations_for(risk),
    }
}

fn recommendations_for(risk: RiskLevel) -> Vec<&'static str> {
    match risk {
        RiskLevel::High => vec![
            "Immediate hepatology consultation required",
            "Consider hospitalization for severe cases",
            "Complete abstinence from alcohol and hepatotoxic drugs",
            "Antiviral therapy if viral hepatitis detected",
            "Monitor for complications (ascites, varices)",
            "Low-sodium diet (<2g/day) if fluid retention",
            "Regular liver function monitoring (weekly)",
        ],
        RiskLevel::Moderate => vec![
            "Gastroenterologist consultation recommended",
            "Identify and treat underlying causes",
            "Avoid alcohol and hepatotoxic medications",
            "Vaccination for Hepatitis A & B if not immune",
            "Weight management if obesity present",
            "Monthly liver function tests",
            "Consider liver biopsy if indicated",
        ],
        RiskLevel::Mild => vec![
            "Follow-up with primary physician",
            "Limit alcohol consumption significantly",
            "Review all medications for hepatotoxicity",
            "Maintain healthy weight through diet and exercise",
            "Increase intake of antioxidant-rich foods",
            "Bi-monthly liver function monitoring",
            "Stay hydrated and get adequate sleep",
        ],
        RiskLevel::Normal => vec![
            "Continue maintaining healthy lifestyle",
            "Moderate alcohol consumption or avoid completely",
            "Regular exercise and balanced nutrition",
            "Annual liver function screening",
            "Maintain healthy weight",
            "Stay hydrated (8-10 glasses water daily)",
            "Avoid unnecessary medications and supplements",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_input_is_normal_function() {
        let result = assess(&LiverInput::default());
        assert_eq!(result.risk, RiskLevel::Normal);
        assert_eq!(result.ast_alt_ratio, None);
        assert_eq!(result.confidence, 80);
    }

    #[test]
    fn hepatitis_pattern_is_high_risk() {
        let input = LiverInput {
            age: 55,                    // +1
            total_bilirubin: 3.5,       // +4
            direct_bilirubin: 1.2,      // +3
            alkaline_phosphatase: 250.0, // +2
            alt: 220.0,                 // +4
            ast: 180.0,                 // +3
            total_proteins: 6.5,
            albumin: 3.2,               // +2
            albumin_globulin_ratio: 1.1,
            ..Default::default()
        };
        // 19 + ratio 0.81 (no points)
        let result = assess(&input);
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.confidence, 95);
    }

    #[test]
    fn alcoholic_pattern_scores_the_ratio() {
        // AST 100 / ALT 40 → ratio 2.5 → +2; AST > 80 → +2
        let input = LiverInput {
            alt: 40.0,
            ast: 100.0,
            ..Default::default()
        };
        let result = assess(&input);
        assert_eq!(result.ast_alt_ratio, Some(2.5));
        // 2 (AST band, 100 is not > 100) + 2 (ratio) = 5 → mild
        assert_eq!(result.risk, RiskLevel::Mild);
    }

    #[test]
    fn ratio_undefined_without_alt_measurement() {
        let input = LiverInput {
            ast: 120.0,
            ..Default::default()
        };
        let result = assess(&input);
        assert_eq!(result.ast_alt_ratio, None);
        // AST alone: +3 → normal bucket, and no division-by-zero blowup
        assert_eq!(result.risk, RiskLevel::Normal);
    }

    #[test]
    fn protein_bands_score_both_directions() {
        let low = assess(&LiverInput {
            total_proteins: 5.5,
            albumin: 2.8,
            albumin_globulin_ratio: 0.8,
            ..Default::default()
        });
        // 2 + 3 + 2 = 7 → mild
        assert_eq!(low.risk, RiskLevel::Mild);

        let high = assess(&LiverInput {
            total_proteins: 9.0,
            albumin_globulin_ratio: 2.8,
            ..Default::default()
        });
        // 1 + 1 = 2 → normal
        assert_eq!(high.risk, RiskLevel::Normal);
    }

    #[test]
    fn bucket_boundaries() {
        // Exactly 10: bilirubin 3.5 (+4), ALT 150 (+3), direct 0.4 (+1),
        // ALP 150 (+1), age 51 (+1) — AST unmeasured, ratio 0 scores nothing
        let input = LiverInput {
            age: 51,
            total_bilirubin: 3.5,
            direct_bilirubin: 0.4,
            alkaline_phosphatase: 150.0,
            alt: 150.0,
            ..Default::default()
        };
        assert_eq!(assess(&input).risk, RiskLevel::Moderate);

        // Drop the age point → 9 → mild
        let input = LiverInput { age: 50, ..input };
        assert_eq!(assess(&input).risk, RiskLevel::Mild);
    }

    #[test]
    fn identical_input_identical_assessment() {
        let input = LiverInput {
            total_bilirubin: 1.5,
            alt: 90.0,
            ast: 95.0,
            ..Default::default()
        };
        assert_eq!(assess(&input).confidence, assess(&input).confidence);
    }

    #[test]
    fn from_form_reads_the_panel() {
        let mut form = AssessmentForm::new();
        form.set("alt", "40");
        form.set("ast", "100");
        let input = LiverInput::from_form(&form);
        assert_eq!(input.ast_alt_ratio(), Some(2.5));
    }
}
