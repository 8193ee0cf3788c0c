//! quizforge-core — Question model, answer evaluation, and adaptive sessions.
//!
//! This crate defines the question data model, the per-kind evaluators, the
//! difficulty controller, and the session engine that the rest of quizforge
//! builds on, plus the bank, history, and statistics collaborators.

pub mod bank;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod report;
pub mod results;
pub mod statistics;
pub mod traits;

pub use engine::{SessionConfig, SessionEngine, SessionMode};
pub use error::{BankError, QuestionError, SessionError};
pub use evaluator::{evaluate, Answer};
pub use model::{Difficulty, Question, QuestionId, QuestionKind, TextMatch};
pub use results::{RoundResult, SessionOutcome, SessionRecord};
