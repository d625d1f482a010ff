pub mod accents;
pub mod evaluator;
pub mod feedback;
pub mod normalize;
pub mod similarity;

// Re-export the main types for convenience
pub use accents::{detect_accent_mistakes, AccentMistake};
pub use evaluator::{evaluate, grade_submission, grade_submission_with, Evaluation, GradeSummary, GradingConfig};
pub use feedback::{compose_feedback, compose_feedback_with, FeedbackLanguage, Tier};
pub use normalize::{normalize, strip_accents};
pub use similarity::ratio;
