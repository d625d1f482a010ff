use chrono::{DateTime, Local};
use itertools::Itertools;
use rusqlite::{params, Connection, Result};
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

/// One graded practice attempt, as persisted in the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub word: String,
    pub submission: String,
    pub was_correct: bool,
    pub similarity: f64,
    pub timestamp: DateTime<Local>,
}

/// Practice statistics for a single word.
#[derive(Debug, Clone, PartialEq)]
pub struct WordProgress {
    pub practices: i64,
    pub correct: i64,
    pub last_practiced: Option<DateTime<Local>>,
}

/// Aggregate statistics across the whole practice history.
#[derive(Debug, Clone)]
pub struct UserStats {
    pub total_practiced: i64,
    pub total_correct: i64,
    /// Percentage in [0, 100]; 0 when nothing was practiced yet.
    pub accuracy: f64,
    pub current_streak: i64,
    pub best_streak: i64,
    pub last_practice: Option<DateTime<Local>>,
}

/// A word the learner keeps getting wrong: practiced at least three times
/// with a success rate under fifty percent.
#[derive(Debug, Clone)]
pub struct ChallengingWord {
    pub word: String,
    pub success_rate: f64,
    pub practices: i64,
}

const MIN_PRACTICES_FOR_CHALLENGING: i64 = 3;
const CHALLENGING_SUCCESS_CUTOFF: f64 = 50.0;

/// Database manager for practice history and derived statistics.
#[derive(Debug)]
pub struct ProgressDb {
    conn: Connection,
}

impl ProgressDb {
    /// Open (and if needed create) the database at the default state path.
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("plume_progress.db"));
        Self::with_path(db_path)
    }

    /// Open a database at an explicit path, creating parent directories.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS practice_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL,
                submission TEXT NOT NULL,
                was_correct BOOLEAN NOT NULL,
                similarity REAL NOT NULL,
                timestamp TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_practice_history_word ON practice_history(word)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_practice_history_timestamp ON practice_history(timestamp)",
            [],
        )?;

        Ok(ProgressDb { conn })
    }

    /// Record one graded attempt.
    pub fn record_attempt(&self, attempt: &Attempt) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO practice_history (word, submission, was_correct, similarity, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                attempt.word,
                attempt.submission,
                attempt.was_correct,
                attempt.similarity,
                attempt.timestamp.to_rfc3339(),
            ],
        )?;

        tracing::debug!(word = %attempt.word, correct = attempt.was_correct, "recorded attempt");
        Ok(())
    }

    /// Statistics for a single word; zeroed when it was never practiced.
    pub fn word_progress(&self, word: &str) -> Result<WordProgress> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                COUNT(*) as practices,
                SUM(CASE WHEN was_correct = 1 THEN 1 ELSE 0 END) as correct,
                MAX(timestamp) as last_practiced
            FROM practice_history
            WHERE word = ?1
            "#,
        )?;

        stmt.query_row([word], |row| {
            let practices: i64 = row.get(0)?;
            let correct: Option<i64> = row.get(1)?;
            let last: Option<String> = row.get(2)?;

            Ok(WordProgress {
                practices,
                correct: correct.unwrap_or(0),
                last_practiced: last.as_deref().and_then(parse_timestamp),
            })
        })
    }

    /// Aggregate statistics. Streaks run over chronological history:
    /// consecutive correct attempts, reset by any miss.
    pub fn user_stats(&self) -> Result<UserStats> {
        let mut stmt = self
            .conn
            .prepare("SELECT was_correct, timestamp FROM practice_history ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            let was_correct: bool = row.get(0)?;
            let timestamp: String = row.get(1)?;
            Ok((was_correct, timestamp))
        })?;

        let mut total_practiced = 0i64;
        let mut total_correct = 0i64;
        let mut current_streak = 0i64;
        let mut best_streak = 0i64;
        let mut last_practice = None;

        for row in rows {
            let (was_correct, timestamp) = row?;
            total_practiced += 1;
            if was_correct {
                total_correct += 1;
                current_streak += 1;
                best_streak = best_streak.max(current_streak);
            } else {
                current_streak = 0;
            }
            last_practice = parse_timestamp(&timestamp).or(last_practice);
        }

        let accuracy = if total_practiced > 0 {
            (total_correct as f64 / total_practiced as f64) * 100.0
        } else {
            0.0
        };

        Ok(UserStats {
            total_practiced,
            total_correct,
            accuracy,
            current_streak,
            best_streak,
            last_practice,
        })
    }

    /// Words practiced often and still mostly failed, worst first.
    pub fn challenging_words(&self, limit: usize) -> Result<Vec<ChallengingWord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                word,
                COUNT(*) as practices,
                (SUM(CASE WHEN was_correct = 1 THEN 1 ELSE 0 END) * 100.0 / COUNT(*)) as success_rate
            FROM practice_history
            GROUP BY word
            HAVING COUNT(*) >= ?1
            "#,
        )?;

        let word_iter = stmt.query_map([MIN_PRACTICES_FOR_CHALLENGING], |row| {
            Ok(ChallengingWord {
                word: row.get(0)?,
                practices: row.get(1)?,
                success_rate: row.get(2)?,
            })
        })?;

        let mut words = Vec::new();
        for word in word_iter {
            let word = word?;
            if word.success_rate < CHALLENGING_SUCCESS_CUTOFF {
                words.push(word);
            }
        }

        Ok(words
            .into_iter()
            .sorted_by(|a, b| {
                a.success_rate
                    .partial_cmp(&b.success_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .take(limit)
            .collect())
    }

    /// The most recent attempts, newest first.
    pub fn recent_activity(&self, limit: usize) -> Result<Vec<Attempt>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT word, submission, was_correct, similarity, timestamp
            FROM practice_history
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let attempt_iter = stmt.query_map([limit as i64], |row| {
            let timestamp_str: String = row.get(4)?;
            let timestamp = parse_timestamp(&timestamp_str).ok_or_else(|| {
                rusqlite::Error::InvalidColumnType(
                    4,
                    "timestamp".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?;

            Ok(Attempt {
                word: row.get(0)?,
                submission: row.get(1)?,
                was_correct: row.get(2)?,
                similarity: row.get(3)?,
                timestamp,
            })
        })?;

        let mut attempts = Vec::new();
        for attempt in attempt_iter {
            attempts.push(attempt?);
        }

        Ok(attempts)
    }

    /// Erase all recorded history.
    pub fn reset(&self) -> Result<()> {
        self.conn.execute("DELETE FROM practice_history", [])?;
        Ok(())
    }

    /// Write the full history as CSV, oldest attempt first.
    pub fn export_csv<W: Write>(&self, writer: W) -> std::result::Result<(), Box<dyn Error>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT word, submission, was_correct, similarity, timestamp
            FROM practice_history
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["word", "submission", "correct", "similarity", "timestamp"])?;

        for row in rows {
            let (word, submission, was_correct, similarity, timestamp) = row?;
            csv_writer.write_record([
                word,
                submission,
                was_correct.to_string(),
                format!("{:.4}", similarity),
                timestamp,
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Local))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(word: &str, correct: bool) -> Attempt {
        Attempt {
            word: word.to_string(),
            submission: word.to_string(),
            was_correct: correct,
            similarity: if correct { 1.0 } else { 0.4 },
            timestamp: Local::now(),
        }
    }

    #[test]
    fn empty_db_has_zeroed_stats() {
        let db = ProgressDb::open_in_memory().unwrap();
        let stats = db.user_stats().unwrap();
        assert_eq!(stats.total_practiced, 0);
        assert_eq!(stats.accuracy, 0.0);
        assert_eq!(stats.current_streak, 0);
        assert!(stats.last_practice.is_none());
    }

    #[test]
    fn word_progress_for_unseen_word_is_zeroed() {
        let db = ProgressDb::open_in_memory().unwrap();
        let progress = db.word_progress("bonjour").unwrap();
        assert_eq!(
            progress,
            WordProgress {
                practices: 0,
                correct: 0,
                last_practiced: None,
            }
        );
    }

    #[test]
    fn recording_updates_word_and_user_stats() {
        let db = ProgressDb::open_in_memory().unwrap();
        db.record_attempt(&attempt("bonjour", true)).unwrap();
        db.record_attempt(&attempt("bonjour", false)).unwrap();
        db.record_attempt(&attempt("merci", true)).unwrap();

        let word = db.word_progress("bonjour").unwrap();
        assert_eq!(word.practices, 2);
        assert_eq!(word.correct, 1);
        assert!(word.last_practiced.is_some());

        let stats = db.user_stats().unwrap();
        assert_eq!(stats.total_practiced, 3);
        assert_eq!(stats.total_correct, 2);
        assert!((stats.accuracy - 200.0 / 3.0).abs() < 1e-9);
        assert!(stats.last_practice.is_some());
    }

    #[test]
    fn streak_resets_on_a_miss_and_best_is_kept() {
        let db = ProgressDb::open_in_memory().unwrap();
        for correct in [true, true, true, false, true, true] {
            db.record_attempt(&attempt("eau", correct)).unwrap();
        }

        let stats = db.user_stats().unwrap();
        assert_eq!(stats.best_streak, 3);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn challenging_words_need_three_practices_and_low_success() {
        let db = ProgressDb::open_in_memory().unwrap();
        // failed often enough to qualify
        for correct in [false, false, true] {
            db.record_attempt(&attempt("gouvernement", correct)).unwrap();
        }
        // failed but not practiced enough
        for correct in [false, false] {
            db.record_attempt(&attempt("chien", correct)).unwrap();
        }
        // practiced a lot but fine
        for correct in [true, true, true, false] {
            db.record_attempt(&attempt("merci", correct)).unwrap();
        }

        let challenging = db.challenging_words(5).unwrap();
        assert_eq!(challenging.len(), 1);
        assert_eq!(challenging[0].word, "gouvernement");
        assert_eq!(challenging[0].practices, 3);
        assert!((challenging[0].success_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn challenging_words_worst_first_and_limited() {
        let db = ProgressDb::open_in_memory().unwrap();
        for correct in [false, false, false] {
            db.record_attempt(&attempt("hier", correct)).unwrap();
        }
        for correct in [false, false, true] {
            db.record_attempt(&attempt("demain", correct)).unwrap();
        }

        let challenging = db.challenging_words(5).unwrap();
        assert_eq!(challenging.len(), 2);
        assert_eq!(challenging[0].word, "hier");

        let limited = db.challenging_words(1).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].word, "hier");
    }

    #[test]
    fn recent_activity_is_newest_first() {
        let db = ProgressDb::open_in_memory().unwrap();
        db.record_attempt(&attempt("pain", true)).unwrap();
        db.record_attempt(&attempt("pomme", false)).unwrap();
        db.record_attempt(&attempt("maison", true)).unwrap();

        let recent = db.recent_activity(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].word, "maison");
        assert_eq!(recent[1].word, "pomme");
    }

    #[test]
    fn reset_empties_the_history() {
        let db = ProgressDb::open_in_memory().unwrap();
        db.record_attempt(&attempt("oui", true)).unwrap();
        db.reset().unwrap();

        assert_eq!(db.user_stats().unwrap().total_practiced, 0);
        assert!(db.recent_activity(10).unwrap().is_empty());
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let db = ProgressDb::open_in_memory().unwrap();
        db.record_attempt(&attempt("chat", true)).unwrap();
        db.record_attempt(&attempt("chien", false)).unwrap();

        let mut out = Vec::new();
        db.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "word,submission,correct,similarity,timestamp");
        assert!(lines[1].starts_with("chat,"));
        assert!(lines[2].starts_with("chien,"));
    }
}
