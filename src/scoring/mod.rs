//! Risk scoring engine.
//!
//! Each disease domain is an independent, pure assessment module built on a
//! shared evaluation core: a weighted rule accumulator (`ScoreCard`), an
//! ascending cutoff ladder (`map_bucket`) and a deterministic confidence
//! synthesizer (`ConfidenceBand`). No I/O, no clock, no randomness —
//! identical input always yields an identical assessment.
//!
//! Thresholds and weights are fixed clinical heuristics, not tunable
//! parameters; each domain module carries its own tables.

pub mod anemia;
pub mod cancer;
pub mod diabetes;
pub mod form;
pub mod heart;
pub mod kidney;
pub mod liver;
pub mod lung;

pub use form::{AssessmentForm, FormSession};

// ─── ScoreCard ───────────────────────────────────────────────────────────────

/// Weighted rule accumulator.
///
/// Risk factors contribute independently: every matched rule adds its weight
/// to the running total, and a record can trigger every rule at once. Within
/// one factor, threshold bands are mutually exclusive — the first (most
/// severe) matching band wins and the rest of that factor is skipped.
#[derive(Debug, Default)]
pub struct ScoreCard {
    total: i32,
    factors: Vec<&'static str>,
}

impl ScoreCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional contribution.
    pub fn add(&mut self, points: i32) {
        self.total += points;
    }

    /// Contribution with a named risk factor attached.
    pub fn add_factor(&mut self, points: i32, factor: &'static str) {
        self.total += points;
        self.factors.push(factor);
    }

    /// Protective contribution — subtracts from the total.
    pub fn credit(&mut self, points: i32) {
        self.total -= points;
    }

    /// Score `value` against descending bands of `(threshold, points)`;
    /// the first band with `value > threshold` contributes, the rest of the
    /// factor is skipped.
    pub fn grade_above(&mut self, value: f64, bands: &[(f64, i32)]) {
        for &(threshold, points) in bands {
            if value > threshold {
                self.total += points;
                return;
            }
        }
    }

    /// Like [`grade_above`](Self::grade_above) but each band carries a risk
    /// factor label.
    pub fn grade_above_named(&mut self, value: f64, bands: &[(f64, i32, &'static str)]) {
        for &(threshold, points, factor) in bands {
            if value > threshold {
                self.total += points;
                self.factors.push(factor);
                return;
            }
        }
    }

    /// Inclusive variant: first band with `value >= threshold` contributes.
    pub fn grade_at_least_named(&mut self, value: f64, bands: &[(f64, i32, &'static str)]) {
        for &(threshold, points, factor) in bands {
            if value >= threshold {
                self.total += points;
                self.factors.push(factor);
                return;
            }
        }
    }

    /// Score `value` against ascending deficiency bands of
    /// `(threshold, points)`; the first band with `value < threshold`
    /// contributes. A non-positive value reads as "not measured" and
    /// contributes nothing — an absent lab never trips a deficiency band.
    pub fn grade_below(&mut self, value: f64, bands: &[(f64, i32)]) {
        if value <= 0.0 {
            return;
        }
        for &(threshold, points) in bands {
            if value < threshold {
                self.total += points;
                return;
            }
        }
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn factors(&self) -> &[&'static str] {
        &self.factors
    }

    pub fn into_factors(self) -> Vec<&'static str> {
        self.factors
    }
}

// ─── Bucket ladder ───────────────────────────────────────────────────────────

/// Map an accumulated score onto a named risk bucket.
///
/// `ladder` lists `(cutoff, bucket)` pairs highest-cutoff-first; the first
/// cutoff the score reaches wins, otherwise `default`. Every integer score
/// maps to exactly one bucket.
pub fn map_bucket<L: Copy>(score: i32, ladder: &[(i32, L)], default: L) -> L {
    for &(cutoff, level) in ladder {
        if score >= cutoff {
            return level;
        }
    }
    default
}

// ─── Confidence ──────────────────────────────────────────────────────────────

/// Deterministic confidence synthesis for a risk bucket.
///
/// The displayed percentage is `base + score`, with the score's contribution
/// limited to `span` and the whole clamped to `cap`. It is a cosmetic
/// certainty figure scaled by how far into the bucket the score landed, not
/// a statistical confidence interval.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceBand {
    pub base: u8,
    pub span: u8,
    pub cap: u8,
}

impl ConfidenceBand {
    pub const fn new(base: u8, span: u8, cap: u8) -> Self {
        Self { base, span, cap }
    }

    /// Confidence percentage for `score`, within `[base, cap]`.
    pub fn rate(&self, score: i32) -> u8 {
        let boost = score.clamp(0, self.span as i32) as u8;
        (self.base + boost).min(self.cap)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_card_scores_zero() {
        let card = ScoreCard::new();
        assert_eq!(card.total(), 0);
        assert!(card.factors().is_empty());
    }

    #[test]
    fn independent_factors_sum() {
        let mut card = ScoreCard::new();
        card.add(3);
        card.add_factor(2, "High blood pressure");
        card.credit(1);
        assert_eq!(card.total(), 4);
        assert_eq!(card.factors(), &["High blood pressure"]);
    }

    #[test]
    fn grade_above_first_match_wins() {
        let bands = [(140.0, 3), (120.0, 2)];

        let mut card = ScoreCard::new();
        card.grade_above(150.0, &bands);
        assert_eq!(card.total(), 3);

        let mut card = ScoreCard::new();
        card.grade_above(130.0, &bands);
        assert_eq!(card.total(), 2);

        let mut card = ScoreCard::new();
        card.grade_above(120.0, &bands);
        assert_eq!(card.total(), 0, "Boundary is exclusive");
    }

    #[test]
    fn grade_below_skips_unmeasured_value() {
        let bands = [(10.0, 3), (12.0, 2)];

        let mut card = ScoreCard::new();
        card.grade_below(0.0, &bands);
        assert_eq!(card.total(), 0, "Zero reads as not measured");

        let mut card = ScoreCard::new();
        card.grade_below(9.0, &bands);
        assert_eq!(card.total(), 3);

        let mut card = ScoreCard::new();
        card.grade_below(11.0, &bands);
        assert_eq!(card.total(), 2);
    }

    #[test]
    fn grade_at_least_is_inclusive() {
        let bands = [(70.0, 5, "Advanced age (≥70)"), (60.0, 4, "Older age (60-69)")];
        let mut card = ScoreCard::new();
        card.grade_at_least_named(70.0, &bands);
        assert_eq!(card.total(), 5);
        assert_eq!(card.factors(), &["Advanced age (≥70)"]);
    }

    #[test]
    fn bucket_ladder_has_no_gaps() {
        #[derive(Debug, Clone, Copy, PartialEq)]
        enum Level {
            Low,
            Moderate,
            High,
        }
        let ladder = [(15, Level::High), (8, Level::Moderate)];

        assert_eq!(map_bucket(20, &ladder, Level::Low), Level::High);
        assert_eq!(map_bucket(15, &ladder, Level::Low), Level::High);
        assert_eq!(map_bucket(14, &ladder, Level::Low), Level::Moderate);
        assert_eq!(map_bucket(8, &ladder, Level::Low), Level::Moderate);
        assert_eq!(map_bucket(7, &ladder, Level::Low), Level::Low);
        assert_eq!(map_bucket(-3, &ladder, Level::Low), Level::Low);
    }

    #[test]
    fn confidence_stays_in_envelope() {
        let band = ConfidenceBand::new(75, 15, 90);
        assert_eq!(band.rate(0), 75);
        assert_eq!(band.rate(-4), 75, "Negative score clamps to the floor");
        assert_eq!(band.rate(8), 83);
        assert_eq!(band.rate(40), 90, "Cap holds for any score");
    }

    #[test]
    fn confidence_is_deterministic() {
        let band = ConfidenceBand::new(85, 10, 95);
        assert_eq!(band.rate(17), band.rate(17));
    }
}
