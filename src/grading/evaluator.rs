use rand::Rng;

use super::accents::{detect_accent_mistakes, AccentMistake};
use super::feedback::{compose_feedback_with, FeedbackLanguage};
use super::normalize::{normalize, strip_accents};
use super::similarity::ratio;

/// Grading knobs, passed explicitly per call. The grader never reads
/// ambient configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingConfig {
    /// Similarity threshold above which a non-exact, non-accent-flagged
    /// answer is accepted. Values outside [0, 1] are clamped.
    pub sensitivity: f64,
    pub feedback_language: FeedbackLanguage,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.8,
            feedback_language: FeedbackLanguage::English,
        }
    }
}

/// Full diagnostic outcome of grading one submission against a target.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub correct: bool,
    pub exact_match: bool,
    pub similarity: f64,
    pub no_accent_similarity: f64,
    pub accent_mistakes: Vec<AccentMistake>,
    pub submitted: String,
    pub expected: String,
}

/// Grade a submission against the expected text. Total over all inputs,
/// including empty strings; every branch produces a result.
///
/// The verdict applies four rules in order, first match wins:
/// exact normalized match → correct; accent-only near miss
/// (`no_accent_similarity > 0.95` with located mistakes) → incorrect, so
/// accent errors are never waved through as "close enough"; similarity at
/// or above the sensitivity → correct; otherwise incorrect.
pub fn evaluate(submitted: &str, expected: &str, sensitivity: f64) -> Evaluation {
    let sensitivity = sensitivity.clamp(0.0, 1.0);

    let norm_submitted = normalize(submitted);
    let norm_expected = normalize(expected);

    let exact_match = norm_submitted == norm_expected;
    let accent_mistakes = detect_accent_mistakes(submitted, expected);
    let similarity = ratio(&norm_submitted, &norm_expected);
    let no_accent_similarity = ratio(
        &strip_accents(&norm_submitted),
        &strip_accents(&norm_expected),
    );

    let correct = if exact_match {
        true
    } else if no_accent_similarity > 0.95 && !accent_mistakes.is_empty() {
        false
    } else {
        similarity >= sensitivity
    };

    Evaluation {
        correct,
        exact_match,
        similarity,
        no_accent_similarity,
        accent_mistakes,
        submitted: submitted.to_string(),
        expected: expected.to_string(),
    }
}

/// Reduced grading result for callers that only render feedback; the raw
/// similarity is kept for diagnostic display.
#[derive(Debug, Clone)]
pub struct GradeSummary {
    pub correct: bool,
    pub feedback: String,
    pub similarity: f64,
}

/// Grade a submission and compose feedback with the caller's random source.
pub fn grade_submission_with<R: Rng>(
    rng: &mut R,
    submitted: &str,
    expected: &str,
    config: &GradingConfig,
) -> GradeSummary {
    let evaluation = evaluate(submitted, expected, config.sensitivity);
    tracing::debug!(
        expected = %evaluation.expected,
        similarity = evaluation.similarity,
        no_accent_similarity = evaluation.no_accent_similarity,
        accent_mistakes = evaluation.accent_mistakes.len(),
        correct = evaluation.correct,
        "graded submission"
    );

    let feedback = compose_feedback_with(rng, &evaluation, config.feedback_language);
    GradeSummary {
        correct: evaluation.correct,
        feedback,
        similarity: evaluation.similarity,
    }
}

/// Grade a submission with thread-local randomness for feedback selection.
pub fn grade_submission(submitted: &str, expected: &str, config: &GradingConfig) -> GradeSummary {
    grade_submission_with(&mut rand::thread_rng(), submitted, expected, config)
}
