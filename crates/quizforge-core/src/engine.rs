//! Session engine.
//!
//! Drives the ask → evaluate → adjust loop for one taker. Selection in
//! adaptive mode prefers unasked questions at the controller's current level
//! and falls back to any unasked question; a question is never asked twice in
//! one session.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::difficulty::DifficultyController;
use crate::error::SessionError;
use crate::evaluator::evaluate;
use crate::model::{Difficulty, Question};
use crate::results::{RoundResult, SessionOutcome, SessionRecord};
use crate::traits::AnswerSource;

/// How questions are picked from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Random pick at the current difficulty level, adjusted after every answer.
    #[default]
    Adaptive,
    /// Every question once, in pool order.
    Linear,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Adaptive => write!(f, "adaptive"),
            SessionMode::Linear => write!(f, "linear"),
        }
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adaptive" => Ok(SessionMode::Adaptive),
            "linear" | "basic" => Ok(SessionMode::Linear),
            other => Err(format!("unknown session mode: {other}")),
        }
    }
}

/// Configuration for the session engine.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Selection strategy.
    pub mode: SessionMode,
    /// Bank identifier stamped on the record.
    pub bank_id: Option<String>,
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_round_start(&self, round: usize, total: usize, question: &Question, level: Difficulty);
    fn on_round_complete(&self, round: usize, result: &RoundResult);
    fn on_session_complete(&self, record: &SessionRecord);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_round_start(&self, _: usize, _: usize, _: &Question, _: Difficulty) {}
    fn on_round_complete(&self, _: usize, _: &RoundResult) {}
    fn on_session_complete(&self, _: &SessionRecord) {}
}

/// Runs quiz sessions with an injectable random source.
pub struct SessionEngine<R> {
    rng: R,
    config: SessionConfig,
}

impl SessionEngine<StdRng> {
    /// Engine with a deterministic, seeded random source.
    pub fn seeded(seed: u64, config: SessionConfig) -> Self {
        Self::new(StdRng::seed_from_u64(seed), config)
    }
}

impl<R: Rng> SessionEngine<R> {
    pub fn new(rng: R, config: SessionConfig) -> Self {
        Self { rng, config }
    }

    /// Run one session of up to `rounds` rounds over `pool`.
    ///
    /// Returns early with [`SessionOutcome::PoolExhausted`] when every question
    /// has been asked, or [`SessionOutcome::Aborted`] when `ask` returns `None`.
    pub fn run<A>(
        &mut self,
        pool: &[Question],
        rounds: usize,
        ask: &mut A,
        progress: &dyn ProgressReporter,
    ) -> Result<SessionRecord, SessionError>
    where
        A: AnswerSource + ?Sized,
    {
        if pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }
        if rounds == 0 {
            return Err(SessionError::ZeroRounds);
        }

        let started_at = Utc::now();
        let mut controller = DifficultyController::new();
        let mut asked = vec![false; pool.len()];
        let mut played = Vec::with_capacity(rounds.min(pool.len()));
        let mut outcome = SessionOutcome::Completed;

        for round in 1..=rounds {
            let level = controller.level();
            let Some(index) = self.select(pool, &asked, level, round) else {
                tracing::debug!("pool exhausted after {} rounds", played.len());
                outcome = SessionOutcome::PoolExhausted;
                break;
            };
            asked[index] = true;
            let question = &pool[index];
            progress.on_round_start(round, rounds, question, level);

            let ask_start = Instant::now();
            let reply = ask.ask(question);
            let elapsed = ask_start.elapsed();

            let Some(answer) = reply else {
                tracing::debug!("session aborted at round {round}");
                outcome = SessionOutcome::Aborted;
                break;
            };

            let correct = evaluate(question, &answer);
            controller.record(correct);

            let result = RoundResult {
                question_id: question.id().clone(),
                topic: question.topic().map(str::to_string),
                difficulty: question.difficulty(),
                level,
                correct,
                elapsed_ms: millis(elapsed),
            };
            progress.on_round_complete(round, &result);
            played.push(result);
        }

        let record = SessionRecord {
            id: Uuid::new_v4(),
            bank_id: self.config.bank_id.clone(),
            started_at,
            rounds_requested: rounds,
            rounds: played,
            final_level: controller.level(),
            outcome,
        };

        tracing::info!(
            "session {} finished ({:?}): {}/{} correct, final level {}",
            record.id,
            record.outcome,
            record.correct_count(),
            record.len(),
            record.final_level
        );
        progress.on_session_complete(&record);

        Ok(record)
    }

    fn select(
        &mut self,
        pool: &[Question],
        asked: &[bool],
        level: Difficulty,
        round: usize,
    ) -> Option<usize> {
        let unasked: Vec<usize> = (0..pool.len()).filter(|&i| !asked[i]).collect();

        match self.config.mode {
            SessionMode::Linear => unasked.first().copied(),
            SessionMode::Adaptive => {
                let at_level: Vec<usize> = unasked
                    .iter()
                    .copied()
                    .filter(|&i| pool[i].difficulty() == level)
                    .collect();

                let eligible = if at_level.is_empty() {
                    tracing::debug!(
                        "round {round}: no unasked questions at level {level}, \
                         falling back to {} unasked",
                        unasked.len()
                    );
                    unasked
                } else {
                    at_level
                };

                eligible.choose(&mut self.rng).copied()
            }
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Answer;
    use crate::model::QuestionKind;
    use std::collections::HashSet;

    fn rating(prompt: &str, difficulty: Difficulty) -> Question {
        Question::new(prompt, QuestionKind::rating(1, 5))
            .unwrap()
            .with_id(prompt)
            .with_difficulty(difficulty)
    }

    fn always(reply: &'static str) -> impl FnMut(&Question) -> Option<Answer> {
        move |_: &Question| Some(Answer::text(reply))
    }

    #[test]
    fn empty_pool_is_rejected() {
        let mut engine = SessionEngine::seeded(1, SessionConfig::default());
        let err = engine
            .run(&[], 5, &mut always("1"), &NoopReporter)
            .unwrap_err();
        assert_eq!(err, SessionError::EmptyPool);
    }

    #[test]
    fn zero_rounds_is_rejected() {
        let pool = vec![rating("a", Difficulty::EASY)];
        let mut engine = SessionEngine::seeded(1, SessionConfig::default());
        let err = engine
            .run(&pool, 0, &mut always("1"), &NoopReporter)
            .unwrap_err();
        assert_eq!(err, SessionError::ZeroRounds);
    }

    #[test]
    fn single_question_pool_ends_early() {
        let pool = vec![rating("only", Difficulty::EASY)];
        let mut engine = SessionEngine::seeded(7, SessionConfig::default());
        let record = engine
            .run(&pool, 5, &mut always("3"), &NoopReporter)
            .unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.outcome, SessionOutcome::PoolExhausted);
        assert_eq!(record.rounds_requested, 5);
    }

    #[test]
    fn adaptive_climbs_without_repeats() {
        let pool = vec![
            rating("easy-1", Difficulty::EASY),
            rating("easy-2", Difficulty::EASY),
            rating("hard-1", Difficulty::HARD),
            rating("hard-2", Difficulty::HARD),
            rating("hard-3", Difficulty::HARD),
        ];

        for seed in 0..20 {
            let mut engine = SessionEngine::seeded(seed, SessionConfig::default());
            let record = engine
                .run(&pool, 5, &mut always("5"), &NoopReporter)
                .unwrap();

            assert_eq!(record.len(), 5);
            assert_eq!(record.outcome, SessionOutcome::Completed);
            let ids: HashSet<_> = record.rounds.iter().map(|r| r.question_id.clone()).collect();
            assert_eq!(ids.len(), 5, "seed {seed} repeated a question");

            assert_eq!(record.rounds[0].level, Difficulty::EASY);
            assert_eq!(record.rounds[0].difficulty, Difficulty::EASY);
            assert_eq!(record.rounds[1].level, Difficulty::MEDIUM);
            for r in &record.rounds[2..] {
                assert_eq!(r.level, Difficulty::HARD);
            }
            assert_eq!(record.final_level, Difficulty::HARD);
        }
    }

    #[test]
    fn wrong_answers_keep_level_at_floor() {
        let pool = vec![
            rating("easy", Difficulty::EASY),
            rating("medium", Difficulty::MEDIUM),
            rating("hard", Difficulty::HARD),
        ];
        let mut engine = SessionEngine::seeded(3, SessionConfig::default());
        let record = engine
            .run(&pool, 3, &mut always("nope"), &NoopReporter)
            .unwrap();
        assert_eq!(record.correct_count(), 0);
        assert_eq!(record.rounds[0].question_id.as_str(), "easy");
        assert!(record.rounds.iter().all(|r| r.level == Difficulty::EASY));
        assert_eq!(record.final_level, Difficulty::EASY);
    }

    #[test]
    fn same_seed_same_order() {
        let pool: Vec<Question> = (0..6)
            .map(|i| rating(&format!("q{i}"), Difficulty::EASY))
            .collect();
        let order = |seed| {
            let mut engine = SessionEngine::seeded(seed, SessionConfig::default());
            engine
                .run(&pool, 6, &mut always("0"), &NoopReporter)
                .unwrap()
                .rounds
                .into_iter()
                .map(|r| r.question_id)
                .collect::<Vec<_>>()
        };
        assert_eq!(order(42), order(42));
    }

    #[test]
    fn abort_stops_without_transition() {
        let pool = vec![
            rating("a", Difficulty::EASY),
            rating("b", Difficulty::EASY),
            rating("c", Difficulty::EASY),
        ];
        let mut replies = vec![Some(Answer::text("2")), None].into_iter();
        let mut ask = |_: &Question| replies.next().flatten();
        let mut engine = SessionEngine::seeded(5, SessionConfig::default());
        let record = engine.run(&pool, 3, &mut ask, &NoopReporter).unwrap();
        assert_eq!(record.outcome, SessionOutcome::Aborted);
        assert_eq!(record.len(), 1);
        assert_eq!(record.final_level, Difficulty::MEDIUM);
    }

    #[test]
    fn linear_mode_follows_pool_order() {
        let pool = vec![
            rating("first", Difficulty::HARD),
            rating("second", Difficulty::EASY),
            rating("third", Difficulty::MEDIUM),
        ];
        let config = SessionConfig {
            mode: SessionMode::Linear,
            bank_id: Some("bank".into()),
        };
        let mut engine = SessionEngine::seeded(9, config);
        let record = engine
            .run(&pool, 10, &mut always("1"), &NoopReporter)
            .unwrap();
        let ids: Vec<&str> = record.rounds.iter().map(|r| r.question_id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
        assert_eq!(record.outcome, SessionOutcome::PoolExhausted);
        assert_eq!(record.bank_id.as_deref(), Some("bank"));
    }

    #[test]
    fn session_mode_parse() {
        assert_eq!("Adaptive".parse::<SessionMode>().unwrap(), SessionMode::Adaptive);
        assert_eq!("basic".parse::<SessionMode>().unwrap(), SessionMode::Linear);
        assert!("timed".parse::<SessionMode>().is_err());
    }

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
