//! Domain error types.
//!
//! Configuration problems (malformed question definitions, impossible session
//! parameters) surface here. Bad answers never do: the evaluators absorb them
//! into an incorrect result.

use thiserror::Error;

/// Errors raised while constructing or editing a question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    /// The prompt is empty or whitespace only.
    #[error("question prompt is empty")]
    EmptyPrompt,

    /// Difficulty must lie in 1..=3.
    #[error("difficulty {0} is out of range (expected 1..=3)")]
    DifficultyOutOfRange(i64),

    /// A choice question was given no options.
    #[error("choice question has no options")]
    EmptyOptions,

    /// A correct-answer index points past the option list.
    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    /// A correct answer names an option that does not exist.
    #[error("correct answer '{0}' is not one of the options")]
    UnknownOption(String),

    /// Two options are the same once trimmed and case-folded.
    #[error("duplicate option '{0}'")]
    DuplicateOption(String),

    /// A multiple-choice question has no correct answers.
    #[error("multiple-choice question has no correct answers")]
    EmptyCorrectSet,

    /// A text question has an empty expected answer.
    #[error("text question has an empty expected answer")]
    EmptyExpected,

    /// Rating scale bounds are not strictly increasing.
    #[error("rating scale is invalid: min {min} must be less than max {max}")]
    InvalidRatingScale { min: i64, max: i64 },

    /// A matching question has no pairs.
    #[error("matching question has no pairs")]
    EmptyPairs,

    /// Two matching keys are the same once trimmed and case-folded.
    #[error("duplicate matching key '{0}'")]
    DuplicateMatchKey(String),

    /// The kind tag is not one of the supported kinds.
    #[error("unknown question kind: {0}")]
    UnknownKind(String),

    /// The text-match strategy tag is not recognised.
    #[error("unknown text match strategy: {0}")]
    UnknownMatchStrategy(String),

    /// A field required by the question kind is missing.
    #[error("{kind} question is missing field '{field}'")]
    MissingField { kind: &'static str, field: &'static str },
}

/// Precondition failures detected before a session runs any round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The question pool is empty.
    #[error("question pool is empty")]
    EmptyPool,

    /// A session must run at least one round.
    #[error("round count must be at least 1")]
    ZeroRounds,
}

/// Errors from bank and library editing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// An index does not refer to an existing entry.
    #[error("index {index} is out of range ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The edit would produce an invalid question.
    #[error(transparent)]
    Question(#[from] QuestionError),
}
