// Progress store behavior against a real on-disk database.

use assert_matches::assert_matches;
use chrono::Local;
use plume::grading::{grade_submission, GradingConfig};
use plume::progress::{Attempt, ProgressDb};
use tempfile::tempdir;

fn record(db: &ProgressDb, word: &str, submission: &str, correct: bool, similarity: f64) {
    db.record_attempt(&Attempt {
        word: word.to_string(),
        submission: submission.to_string(),
        was_correct: correct,
        similarity,
        timestamp: Local::now(),
    })
    .unwrap();
}

#[test]
fn database_file_and_parent_dirs_are_created() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("progress.db");

    let db = ProgressDb::with_path(&path).unwrap();
    record(&db, "bonjour", "bonjour", true, 1.0);

    assert!(path.exists());
}

#[test]
fn unseen_word_has_no_history() {
    let dir = tempdir().unwrap();
    let db = ProgressDb::with_path(dir.path().join("progress.db")).unwrap();
    assert_matches!(
        db.word_progress("inconnu"),
        Ok(progress) if progress.practices == 0 && progress.last_practiced.is_none()
    );
}

#[test]
fn history_survives_reopening() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.db");

    {
        let db = ProgressDb::with_path(&path).unwrap();
        record(&db, "merci", "merci", true, 1.0);
        record(&db, "merci", "mersi", false, 0.8);
    }

    let db = ProgressDb::with_path(&path).unwrap();
    let progress = db.word_progress("merci").unwrap();
    assert_eq!(progress.practices, 2);
    assert_eq!(progress.correct, 1);

    let stats = db.user_stats().unwrap();
    assert_eq!(stats.total_practiced, 2);
    assert_eq!(stats.best_streak, 1);
}

#[test]
fn grading_results_flow_into_the_store() {
    let dir = tempdir().unwrap();
    let db = ProgressDb::with_path(dir.path().join("progress.db")).unwrap();
    let config = GradingConfig::default();

    for (submission, expected) in [("bonjour", "bonjour"), ("ecole", "école"), ("eau", "eau")] {
        let summary = grade_submission(submission, expected, &config);
        record(&db, expected, submission, summary.correct, summary.similarity);
    }

    let stats = db.user_stats().unwrap();
    assert_eq!(stats.total_practiced, 3);
    assert_eq!(stats.total_correct, 2);
    // the accent miss broke the streak in the middle
    assert_eq!(stats.best_streak, 1);
    assert_eq!(stats.current_streak, 1);

    let recent = db.recent_activity(10).unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].word, "eau");
}

#[test]
fn export_matches_recorded_history() {
    let dir = tempdir().unwrap();
    let db = ProgressDb::with_path(dir.path().join("progress.db")).unwrap();
    record(&db, "chat", "chat", true, 1.0);
    record(&db, "chien", "chein", false, 0.6);

    let mut out = Vec::new();
    db.export_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("word,submission,correct,similarity,timestamp"));
    assert!(text.contains("chat,chat,true,1.0000"));
    assert!(text.contains("chien,chein,false,0.6000"));
}
