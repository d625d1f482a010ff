use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;

use super::accents::AccentMistake;
use super::evaluator::Evaluation;

/// Language the composed feedback message is written in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum FeedbackLanguage {
    English,
    French,
}

impl FeedbackLanguage {
    /// Parse a config string. Anything unrecognized falls back to English
    /// rather than erroring, so a stale config file never breaks grading.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "french" | "francais" | "français" | "fr" => FeedbackLanguage::French,
            _ => FeedbackLanguage::English,
        }
    }
}

/// Which family of messages a grading outcome maps to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tier {
    Perfect,
    AlmostPerfect,
    Good,
    NeedsWork,
}

impl Tier {
    pub fn of(evaluation: &Evaluation) -> Self {
        if evaluation.exact_match {
            Tier::Perfect
        } else if evaluation.no_accent_similarity > 0.95 && !evaluation.accent_mistakes.is_empty() {
            Tier::AlmostPerfect
        } else if evaluation.similarity >= 0.7 {
            Tier::Good
        } else {
            Tier::NeedsWork
        }
    }
}

struct TemplateSet {
    perfect: [&'static str; 3],
    almost_perfect: [&'static str; 3],
    good: [&'static str; 3],
    needs_work: [&'static str; 3],
    accent_tips: [&'static str; 3],
}

const ENGLISH: TemplateSet = TemplateSet {
    perfect: [
        "Perfect! Your writing is excellent.",
        "Fantastic job! Your French writing is spot on.",
        "Excellent! Your handwriting and spelling are perfect.",
    ],
    almost_perfect: [
        "Very close! Just a small accent issue.",
        "Nearly perfect! Pay attention to the accents.",
        "Almost there! Check the accents carefully.",
    ],
    good: [
        "Good attempt! You're on the right track.",
        "Well done! Just a few small errors to fix.",
        "Nice work! With a bit more practice, you'll nail it.",
    ],
    needs_work: [
        "Keep practicing! Try to pay more attention to spelling.",
        "You're making progress! Focus on the correct spelling.",
        "Continue your efforts! Pay attention to each letter.",
    ],
    accent_tips: [
        "Remember that '{submitted}' should have an accent: '{expected}'.",
        "The letter '{submitted}' needs an accent in this word: '{expected}'.",
        "Don't forget the accent on '{submitted}' → '{expected}'.",
    ],
};

const FRENCH: TemplateSet = TemplateSet {
    perfect: [
        "Parfait ! Votre écriture est excellente.",
        "Fantastique ! Votre français écrit est impeccable.",
        "Excellent ! Votre écriture et votre orthographe sont parfaites.",
    ],
    almost_perfect: [
        "Très proche ! Juste un petit problème d'accent.",
        "Presque parfait ! Faites attention aux accents.",
        "Vous y êtes presque ! Vérifiez bien les accents.",
    ],
    good: [
        "Bonne tentative ! Vous êtes sur la bonne voie.",
        "Bien joué ! Juste quelques petites erreurs à corriger.",
        "Bon travail ! Avec un peu plus de pratique, vous y arriverez.",
    ],
    needs_work: [
        "Continuez à pratiquer ! Essayez de faire plus attention à l'orthographe.",
        "Vous progressez ! Concentrez-vous sur l'orthographe correcte.",
        "Poursuivez vos efforts ! Faites attention à chaque lettre.",
    ],
    accent_tips: [
        "N'oubliez pas que '{submitted}' devrait avoir un accent : '{expected}'.",
        "La lettre '{submitted}' a besoin d'un accent dans ce mot : '{expected}'.",
        "N'oubliez pas l'accent sur '{submitted}' → '{expected}'.",
    ],
};

/// How many accent hints an almost-perfect message carries at most.
const MAX_ACCENT_TIPS: usize = 2;

/// Compose a feedback message with the caller's random source, so tests can
/// seed it and assert exact output.
pub fn compose_feedback_with<R: Rng>(
    rng: &mut R,
    evaluation: &Evaluation,
    language: FeedbackLanguage,
) -> String {
    let templates = match language {
        FeedbackLanguage::English => &ENGLISH,
        FeedbackLanguage::French => &FRENCH,
    };

    match Tier::of(evaluation) {
        Tier::Perfect => pick(rng, &templates.perfect).to_string(),
        Tier::AlmostPerfect => {
            let mut message = pick(rng, &templates.almost_perfect).to_string();
            for mistake in evaluation.accent_mistakes.iter().take(MAX_ACCENT_TIPS) {
                message.push(' ');
                message.push_str(&render_tip(pick(rng, &templates.accent_tips), mistake));
            }
            message
        }
        Tier::Good => pick(rng, &templates.good).to_string(),
        Tier::NeedsWork => {
            format!("{} {}", pick(rng, &templates.needs_work), evaluation.expected)
        }
    }
}

/// Thread-rng convenience wrapper.
pub fn compose_feedback(evaluation: &Evaluation, language: FeedbackLanguage) -> String {
    compose_feedback_with(&mut rand::thread_rng(), evaluation, language)
}

fn pick<R: Rng>(rng: &mut R, set: &[&'static str; 3]) -> &'static str {
    set.choose(rng).copied().expect("template sets are non-empty")
}

fn render_tip(template: &str, mistake: &AccentMistake) -> String {
    template
        .replace("{submitted}", &mistake.submitted.to_string())
        .replace("{expected}", &mistake.expected.to_string())
}
