use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::Parser;
use rand::seq::SliceRandom;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use time_humanize::{Accuracy, HumanTime, Tense};

use plume::config::{AppConfig, ConfigStore, FileConfigStore};
use plume::grading::{grade_submission, FeedbackLanguage};
use plume::progress::{Attempt, ProgressDb};
use plume::session::PracticeSession;
use plume::wordlist::{Difficulty, WordEntry, WordList};

/// french writing practice with accent-aware grading
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Terminal French writing practice: you are shown an English gloss, you write \
                  the French word, and the grader scores it with accent-aware feedback while \
                  tracking your progress over time."
)]
struct Cli {
    /// number of words to practice in one session
    #[clap(short = 'n', long, default_value_t = 5)]
    attempts: usize,

    /// difficulty level of the embedded word lists
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// draw from every level up to the chosen difficulty
    #[clap(long)]
    cumulative: bool,

    /// practice from a custom word list (json file with french/english pairs)
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// similarity threshold in [0,1] above which a non-exact answer passes
    #[clap(short = 's', long)]
    sensitivity: Option<f64>,

    /// language the feedback messages are written in
    #[clap(short = 'f', long, value_enum)]
    feedback_language: Option<FeedbackLanguage>,

    /// print practice statistics and exit
    #[clap(long)]
    stats: bool,

    /// export the practice history as csv and exit
    #[clap(long)]
    export: Option<PathBuf>,

    /// erase all recorded progress and exit (requires --yes)
    #[clap(long)]
    reset: bool,

    /// confirm a destructive flag such as --reset
    #[clap(long)]
    yes: bool,

    /// persist the effective difficulty/sensitivity/language as new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Fold per-run flag overrides into the loaded config.
    fn apply_to(&self, cfg: &mut AppConfig) {
        if let Some(difficulty) = self.difficulty {
            cfg.difficulty = difficulty.to_string().to_lowercase();
        }
        if let Some(sensitivity) = self.sensitivity {
            cfg.sensitivity = sensitivity;
        }
        if let Some(language) = self.feedback_language {
            cfg.feedback_language = language.to_string().to_lowercase();
        }
    }
}

fn main() -> Result<()> {
    plume::logging::init_tracing("warn");

    let cli = Cli::parse();
    let store = FileConfigStore::new();
    let mut cfg = store.load();
    cli.apply_to(&mut cfg);

    if cli.save_config {
        store.save(&cfg).context("failed to save config")?;
    }

    if cli.stats {
        let db = ProgressDb::new().context("failed to open the progress database")?;
        return print_stats(&db);
    }

    if let Some(path) = &cli.export {
        let db = ProgressDb::new().context("failed to open the progress database")?;
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        db.export_csv(file)
            .map_err(|e| anyhow!("failed to export history: {e}"))?;
        println!("Exported practice history to {}", path.display());
        return Ok(());
    }

    if cli.reset {
        if !cli.yes {
            bail!("--reset erases all recorded progress; pass --yes to confirm");
        }
        let db = ProgressDb::new().context("failed to open the progress database")?;
        db.reset().context("failed to reset progress")?;
        println!("Progress erased.");
        return Ok(());
    }

    run_practice(&cli, &cfg)
}

fn effective_difficulty(cfg: &AppConfig) -> Difficulty {
    <Difficulty as clap::ValueEnum>::from_str(&cfg.difficulty, true).unwrap_or(Difficulty::A1)
}

fn load_entries(cli: &Cli, cfg: &AppConfig) -> Result<Vec<WordEntry>> {
    if let Some(path) = &cli.words {
        let list = WordList::from_file(path)
            .map_err(|e| anyhow!("failed to read word list {}: {e}", path.display()))?;
        return Ok(list.words);
    }

    let difficulty = effective_difficulty(cfg);
    if cli.cumulative {
        Ok(WordList::pool_through(difficulty))
    } else {
        Ok(WordList::load(difficulty).words)
    }
}

fn run_practice(cli: &Cli, cfg: &AppConfig) -> Result<()> {
    let entries = load_entries(cli, cfg)?;
    if entries.is_empty() {
        bail!("the word list is empty");
    }

    let grading = cfg.grading_config();
    let db = match ProgressDb::new() {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::warn!(error = %e, "progress database unavailable; attempts will not be recorded");
            None
        }
    };

    let mut session = PracticeSession::default();
    let mut rng = rand::thread_rng();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Write the French word for each prompt. A blank line stops the session.\n");

    for round in 1..=cli.attempts {
        let entry = entries.choose(&mut rng).expect("non-empty word list");

        print!("[{}/{}] \"{}\" → ", round, cli.attempts, entry.english);
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let submission = line.trim();
        if submission.is_empty() {
            break;
        }

        let summary = grade_submission(submission, &entry.french, &grading);
        let marker = if summary.correct { "✓" } else { "✗" };
        println!(
            "{} {} (similarity {:.0}%)\n",
            marker,
            summary.feedback,
            summary.similarity * 100.0
        );

        session.record(summary.correct);

        if let Some(db) = &db {
            let attempt = Attempt {
                word: entry.french.clone(),
                submission: submission.to_string(),
                was_correct: summary.correct,
                similarity: summary.similarity,
                timestamp: Local::now(),
            };
            if let Err(e) = db.record_attempt(&attempt) {
                tracing::warn!(error = %e, "failed to record attempt");
            }
        }
    }

    if session.practiced > 0 {
        println!(
            "Session: {}/{} correct ({:.0}%), best streak {}",
            session.correct,
            session.practiced,
            session.accuracy(),
            session.best_streak
        );
    }

    Ok(())
}

fn print_stats(db: &ProgressDb) -> Result<()> {
    let stats = db.user_stats().context("failed to read statistics")?;
    if stats.total_practiced == 0 {
        println!("No practice recorded yet.");
        return Ok(());
    }

    println!(
        "Practiced {} words, {} correct ({:.0}%)",
        stats.total_practiced, stats.total_correct, stats.accuracy
    );
    println!(
        "Streak: {} current, {} best",
        stats.current_streak, stats.best_streak
    );
    if let Some(last) = stats.last_practice {
        println!("Last practice: {}", ago(last));
    }

    let challenging = db
        .challenging_words(5)
        .context("failed to read challenging words")?;
    if !challenging.is_empty() {
        println!("\nChallenging words:");
        for word in challenging {
            println!(
                "  {} — {:.0}% correct over {} tries",
                word.word, word.success_rate, word.practices
            );
        }
    }

    let recent = db
        .recent_activity(10)
        .context("failed to read recent activity")?;
    if !recent.is_empty() {
        println!("\nRecent activity:");
        for attempt in recent {
            let marker = if attempt.was_correct { "✓" } else { "✗" };
            println!(
                "  {} {} (\"{}\", {})",
                marker,
                attempt.word,
                attempt.submission,
                ago(attempt.timestamp)
            );
        }
    }

    Ok(())
}

fn ago(timestamp: chrono::DateTime<Local>) -> String {
    let elapsed = Local::now()
        .signed_duration_since(timestamp)
        .to_std()
        .unwrap_or_default();
    HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
}
