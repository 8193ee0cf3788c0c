//! Long-run statistics across finished sessions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::results::SessionRecord;
use crate::traits::ResultSink;

/// Topic key used for rounds whose question had no topic.
pub const NO_TOPIC: &str = "(no topic)";

/// Asked/correct tally for one slice of the results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownStats {
    pub asked: usize,
    pub correct: usize,
    pub accuracy: f64,
}

impl BreakdownStats {
    fn add(&mut self, correct: bool) {
        self.asked += 1;
        if correct {
            self.correct += 1;
        }
        self.accuracy = self.correct as f64 / self.asked as f64;
    }
}

/// Aggregate statistics across all sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of sessions folded in.
    pub sessions: usize,
    /// Rounds played across all sessions.
    pub total_rounds: usize,
    /// Correct answers across all sessions.
    pub total_correct: usize,
    /// Correct answers over rounds played.
    pub accuracy: f64,
    /// Mean correct answers per session.
    pub avg_score: f64,
    /// Highest correct count in a single session.
    pub best_score: usize,
    /// Mean total answer time per session in milliseconds.
    pub avg_session_ms: u64,
    /// Mean answer time per question in milliseconds.
    pub avg_question_ms: u64,
    /// Mean controller level at session end.
    pub avg_final_level: f64,
    /// Accuracy by question topic.
    pub per_topic: BTreeMap<String, BreakdownStats>,
    /// Accuracy by question difficulty.
    pub per_difficulty: BTreeMap<u8, BreakdownStats>,
}

/// Folds finished session records into [`AggregateStats`].
#[derive(Debug, Clone, Default)]
pub struct ScoringAggregator {
    sessions: usize,
    total_rounds: usize,
    total_correct: usize,
    best_score: usize,
    total_ms: u64,
    final_level_sum: u64,
    per_topic: BTreeMap<String, BreakdownStats>,
    per_difficulty: BTreeMap<u8, BreakdownStats>,
}

impl ScoringAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate a batch of records in one go.
    pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a SessionRecord>) -> AggregateStats {
        let mut aggregator = Self::new();
        for record in records {
            aggregator.fold(record);
        }
        aggregator.stats()
    }

    /// Fold one session into the running totals.
    pub fn fold(&mut self, record: &SessionRecord) {
        self.sessions += 1;
        self.total_rounds += record.len();
        let correct = record.correct_count();
        self.total_correct += correct;
        self.best_score = self.best_score.max(correct);
        self.final_level_sum += u64::from(record.final_level.get());

        for round in &record.rounds {
            self.total_ms += round.elapsed_ms;
            self.per_topic
                .entry(round.topic.clone().unwrap_or_else(|| NO_TOPIC.to_string()))
                .or_default()
                .add(round.correct);
            self.per_difficulty
                .entry(round.difficulty.get())
                .or_default()
                .add(round.correct);
        }
    }

    pub fn stats(&self) -> AggregateStats {
        let ratio = |num: f64, den: usize| if den == 0 { 0.0 } else { num / den as f64 };

        AggregateStats {
            sessions: self.sessions,
            total_rounds: self.total_rounds,
            total_correct: self.total_correct,
            accuracy: ratio(self.total_correct as f64, self.total_rounds),
            avg_score: ratio(self.total_correct as f64, self.sessions),
            best_score: self.best_score,
            avg_session_ms: self.total_ms / self.sessions.max(1) as u64,
            avg_question_ms: self.total_ms / self.total_rounds.max(1) as u64,
            avg_final_level: ratio(self.final_level_sum as f64, self.sessions),
            per_topic: self.per_topic.clone(),
            per_difficulty: self.per_difficulty.clone(),
        }
    }
}

impl ResultSink for ScoringAggregator {
    fn accept(&mut self, record: &SessionRecord) -> anyhow::Result<()> {
        self.fold(record);
        Ok(())
    }
}
