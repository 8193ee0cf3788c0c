//! Session result types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Difficulty, QuestionId};

/// Outcome of a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Question that was asked.
    pub question_id: QuestionId,
    /// Topic of the question, if any.
    #[serde(default)]
    pub topic: Option<String>,
    /// Difficulty of the question itself.
    pub difficulty: Difficulty,
    /// Controller level when the question was selected.
    pub level: Difficulty,
    /// Whether the answer was judged correct.
    pub correct: bool,
    /// Time the taker spent answering, in milliseconds.
    pub elapsed_ms: u64,
}

impl RoundResult {
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// All requested rounds were played.
    Completed,
    /// The pool ran out of unasked questions first.
    PoolExhausted,
    /// The taker stopped answering.
    Aborted,
}

impl SessionOutcome {
    /// Whether the record should be handed to result sinks.
    pub fn is_finished(self) -> bool {
        !matches!(self, SessionOutcome::Aborted)
    }
}

/// The finalized record of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique session identifier.
    pub id: Uuid,
    /// Bank the pool came from, if known.
    #[serde(default)]
    pub bank_id: Option<String>,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// Number of rounds the caller asked for.
    pub rounds_requested: usize,
    /// Rounds in the order they were played.
    pub rounds: Vec<RoundResult>,
    /// Controller level after the last round.
    pub final_level: Difficulty,
    /// How the session ended.
    pub outcome: SessionOutcome,
}

impl SessionRecord {
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn correct_count(&self) -> usize {
        self.rounds.iter().filter(|r| r.correct).count()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.rounds.iter().map(RoundResult::elapsed).sum()
    }

    /// Fraction of rounds answered correctly (0.0 for an empty record).
    pub fn accuracy(&self) -> f64 {
        if self.rounds.is_empty() {
            0.0
        } else {
            self.correct_count() as f64 / self.rounds.len() as f64
        }
    }

    /// Mean answer time per round.
    pub fn average_elapsed(&self) -> Duration {
        match u32::try_from(self.rounds.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.total_elapsed() / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(correct: bool, elapsed_ms: u64) -> RoundResult {
        RoundResult {
            question_id: QuestionId::generate(),
            topic: None,
            difficulty: Difficulty::EASY,
            level: Difficulty::EASY,
            correct,
            elapsed_ms,
        }
    }

    fn record(rounds: Vec<RoundResult>) -> SessionRecord {
        SessionRecord {
            id: Uuid::nil(),
            bank_id: None,
            started_at: Utc::now(),
            rounds_requested: rounds.len(),
            rounds,
            final_level: Difficulty::EASY,
            outcome: SessionOutcome::Completed,
        }
    }

    #[test]
    fn tallies() {
        let r = record(vec![round(true, 1000), round(false, 500), round(true, 1500)]);
        assert_eq!(r.len(), 3);
        assert_eq!(r.correct_count(), 2);
        assert_eq!(r.total_elapsed(), Duration::from_millis(3000));
        assert_eq!(r.average_elapsed(), Duration::from_millis(1000));
        assert!((r.accuracy() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_record() {
        let r = record(vec![]);
        assert!(r.is_empty());
        assert_eq!(r.accuracy(), 0.0);
        assert_eq!(r.average_elapsed(), Duration::ZERO);
    }

    #[test]
    fn outcome_serde() {
        assert_eq!(
            serde_json::to_string(&SessionOutcome::PoolExhausted).unwrap(),
            "\"pool_exhausted\""
        );
        assert!(!SessionOutcome::Aborted.is_finished());
        assert!(SessionOutcome::PoolExhausted.is_finished());
    }
}
