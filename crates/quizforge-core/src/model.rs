//! Core data model types for quizforge.
//!
//! A [`Question`] pairs editable presentation fields (prompt, topic,
//! difficulty) with a closed [`QuestionKind`] payload. Every payload is
//! validated when it is attached to a question, so the evaluators can assume
//! that correct-answer indices and keys always exist.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QuestionError;
use crate::evaluator::{self, Answer};

/// Stable handle for a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Question difficulty, always within `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const EASY: Difficulty = Difficulty(1);
    pub const MEDIUM: Difficulty = Difficulty(2);
    pub const HARD: Difficulty = Difficulty(3);

    pub const MIN: Difficulty = Self::EASY;
    pub const MAX: Difficulty = Self::HARD;

    pub fn new(level: i64) -> Result<Self, QuestionError> {
        if (1..=3).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(QuestionError::DifficultyOutOfRange(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// One step harder, saturating at [`Difficulty::MAX`].
    pub fn harder(self) -> Self {
        Self((self.0 + 1).min(Self::MAX.0))
    }

    /// One step easier, saturating at [`Difficulty::MIN`].
    pub fn easier(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN.0))
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASY
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Difficulty {
    type Error = QuestionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

/// How a text answer is compared against the expected answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMatch {
    /// Normalized input must equal the expected answer.
    Exact,
    /// Normalized input may also be a non-empty substring of the expected answer.
    #[default]
    Partial,
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatch::Exact => write!(f, "exact"),
            TextMatch::Partial => write!(f, "partial"),
        }
    }
}

impl FromStr for TextMatch {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(TextMatch::Exact),
            "partial" => Ok(TextMatch::Partial),
            other => Err(QuestionError::UnknownMatchStrategy(other.to_string())),
        }
    }
}

/// Kind-specific question payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free-text answer.
    Text { expected: String, strategy: TextMatch },
    /// Exactly one option is correct (0-based index).
    SingleChoice {
        options: Vec<String>,
        correct_index: usize,
    },
    /// A fixed set of options is correct (0-based indices).
    MultipleChoice {
        options: Vec<String>,
        correct_indices: BTreeSet<usize>,
    },
    /// Any integer inside the inclusive scale is accepted.
    Rating { min: i64, max: i64 },
    /// Every left key must be matched with its right value.
    Matching { pairs: BTreeMap<String, String> },
}

impl QuestionKind {
    pub fn text(expected: impl Into<String>, strategy: TextMatch) -> Self {
        QuestionKind::Text {
            expected: expected.into(),
            strategy,
        }
    }

    pub fn single_choice<S: Into<String>>(options: Vec<S>, correct_index: usize) -> Self {
        QuestionKind::SingleChoice {
            options: options.into_iter().map(Into::into).collect(),
            correct_index,
        }
    }

    /// Build a single-choice payload whose correct answer is named by option text.
    pub fn single_choice_by_text<S: Into<String>>(
        options: Vec<S>,
        correct: &str,
    ) -> Result<Self, QuestionError> {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let correct_index = option_position(&options, correct)?;
        Ok(QuestionKind::SingleChoice {
            options,
            correct_index,
        })
    }

    pub fn multiple_choice<S: Into<String>>(
        options: Vec<S>,
        correct_indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        QuestionKind::MultipleChoice {
            options: options.into_iter().map(Into::into).collect(),
            correct_indices: correct_indices.into_iter().collect(),
        }
    }

    /// Build a multiple-choice payload whose correct answers are named by option text.
    pub fn multiple_choice_by_text<S: Into<String>>(
        options: Vec<S>,
        correct: &[&str],
    ) -> Result<Self, QuestionError> {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let correct_indices = correct
            .iter()
            .map(|c| option_position(&options, c))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(QuestionKind::MultipleChoice {
            options,
            correct_indices,
        })
    }

    pub fn rating(min: i64, max: i64) -> Self {
        QuestionKind::Rating { min, max }
    }

    pub fn matching<K: Into<String>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        QuestionKind::Matching {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The tag used for this kind in bank files.
    pub fn tag(&self) -> &'static str {
        match self {
            QuestionKind::Text { .. } => "text",
            QuestionKind::SingleChoice { .. } => "single_choice",
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::Rating { .. } => "rating",
            QuestionKind::Matching { .. } => "matching",
        }
    }

    /// Options shown to the taker, if this is a choice kind.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            QuestionKind::SingleChoice { options, .. }
            | QuestionKind::MultipleChoice { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Check the payload invariants.
    pub fn validate(&self) -> Result<(), QuestionError> {
        match self {
            QuestionKind::Text { expected, .. } => {
                if expected.trim().is_empty() {
                    return Err(QuestionError::EmptyExpected);
                }
            }
            QuestionKind::SingleChoice {
                options,
                correct_index,
            } => {
                if options.is_empty() {
                    return Err(QuestionError::EmptyOptions);
                }
                if let Some(dup) = first_duplicate(options) {
                    return Err(QuestionError::DuplicateOption(dup.clone()));
                }
                if *correct_index >= options.len() {
                    return Err(QuestionError::CorrectIndexOutOfRange {
                        index: *correct_index,
                        len: options.len(),
                    });
                }
            }
            QuestionKind::MultipleChoice {
                options,
                correct_indices,
            } => {
                if options.is_empty() {
                    return Err(QuestionError::EmptyOptions);
                }
                if let Some(dup) = first_duplicate(options) {
                    return Err(QuestionError::DuplicateOption(dup.clone()));
                }
                if correct_indices.is_empty() {
                    return Err(QuestionError::EmptyCorrectSet);
                }
                if let Some(&index) = correct_indices.iter().find(|&&i| i >= options.len()) {
                    return Err(QuestionError::CorrectIndexOutOfRange {
                        index,
                        len: options.len(),
                    });
                }
            }
            QuestionKind::Rating { min, max } => {
                if min >= max {
                    return Err(QuestionError::InvalidRatingScale {
                        min: *min,
                        max: *max,
                    });
                }
            }
            QuestionKind::Matching { pairs } => {
                if pairs.is_empty() {
                    return Err(QuestionError::EmptyPairs);
                }
                if let Some(dup) = first_duplicate(pairs.keys()) {
                    return Err(QuestionError::DuplicateMatchKey(dup.clone()));
                }
            }
        }
        Ok(())
    }
}

/// First entry that collides with an earlier one once trimmed and case-folded.
fn first_duplicate<'a>(items: impl IntoIterator<Item = &'a String>) -> Option<&'a String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .find(|item| !seen.insert(item.trim().to_lowercase()))
}

fn option_position(options: &[String], wanted: &str) -> Result<usize, QuestionError> {
    let wanted_norm = wanted.trim().to_lowercase();
    options
        .iter()
        .position(|o| o.trim().to_lowercase() == wanted_norm)
        .ok_or_else(|| QuestionError::UnknownOption(wanted.to_string()))
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    topic: Option<String>,
    difficulty: Difficulty,
    kind: QuestionKind,
}

impl Question {
    /// Create a question with a generated id and difficulty 1.
    pub fn new(prompt: impl Into<String>, kind: QuestionKind) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        kind.validate()?;
        Ok(Self {
            id: QuestionId::generate(),
            prompt,
            topic: None,
            difficulty: Difficulty::default(),
            kind,
        })
    }

    pub fn with_id(mut self, id: impl Into<QuestionId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.set_topic(Some(topic.into()));
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> Result<(), QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        self.prompt = prompt;
        Ok(())
    }

    /// Blank topics are stored as no topic.
    pub fn set_topic(&mut self, topic: Option<String>) {
        self.topic = topic.filter(|t| !t.trim().is_empty());
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Replace the payload; the question is left untouched if the new one is invalid.
    pub fn set_kind(&mut self, kind: QuestionKind) -> Result<(), QuestionError> {
        kind.validate()?;
        self.kind = kind;
        Ok(())
    }

    /// Judge an answer to this question.
    pub fn evaluate(&self, answer: &Answer) -> bool {
        evaluator::evaluate(self, answer)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} | difficulty {}] {}",
            self.topic.as_deref().unwrap_or("no topic"),
            self.difficulty,
            self.prompt
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_bounds() {
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(4).is_err());
        assert_eq!(Difficulty::new(2).unwrap(), Difficulty::MEDIUM);
        assert_eq!(Difficulty::HARD.harder(), Difficulty::HARD);
        assert_eq!(Difficulty::EASY.easier(), Difficulty::EASY);
        assert_eq!(Difficulty::EASY.harder(), Difficulty::MEDIUM);
    }

    #[test]
    fn difficulty_serde_rejects_out_of_range() {
        assert_eq!(serde_json::to_string(&Difficulty::HARD).unwrap(), "3");
        assert_eq!(
            serde_json::from_str::<Difficulty>("2").unwrap(),
            Difficulty::MEDIUM
        );
        assert!(serde_json::from_str::<Difficulty>("7").is_err());
    }

    #[test]
    fn text_match_parse() {
        assert_eq!("Exact".parse::<TextMatch>().unwrap(), TextMatch::Exact);
        assert_eq!("partial".parse::<TextMatch>().unwrap(), TextMatch::Partial);
        assert!("fuzzy".parse::<TextMatch>().is_err());
    }

    #[test]
    fn empty_prompt_rejected() {
        let err = Question::new("   ", QuestionKind::rating(1, 5)).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn dangling_correct_index_rejected() {
        let err = Question::new(
            "Capital of France?",
            QuestionKind::single_choice(vec!["Paris", "London"], 2),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn empty_options_rejected() {
        let err = Question::new(
            "Pick one",
            QuestionKind::single_choice(Vec::<String>::new(), 0),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyOptions);
    }

    #[test]
    fn multiple_choice_invariants() {
        let empty = QuestionKind::multiple_choice(vec!["a", "b"], []);
        assert_eq!(empty.validate(), Err(QuestionError::EmptyCorrectSet));

        let dangling = QuestionKind::multiple_choice(vec!["a", "b"], [0, 5]);
        assert_eq!(
            dangling.validate(),
            Err(QuestionError::CorrectIndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn choice_by_text_resolves_indices() {
        let kind = QuestionKind::multiple_choice_by_text(
            vec!["Python", "C++", "HTML", "Java"],
            &["python", "C++"],
        )
        .unwrap();
        match kind {
            QuestionKind::MultipleChoice {
                correct_indices, ..
            } => assert_eq!(correct_indices, BTreeSet::from([0, 1])),
            other => panic!("unexpected kind: {other:?}"),
        }

        let err = QuestionKind::single_choice_by_text(vec!["Paris"], "Rome").unwrap_err();
        assert_eq!(err, QuestionError::UnknownOption("Rome".into()));
    }

    #[test]
    fn rating_scale_must_increase() {
        assert_eq!(
            QuestionKind::rating(5, 5).validate(),
            Err(QuestionError::InvalidRatingScale { min: 5, max: 5 })
        );
    }

    #[test]
    fn matching_requires_pairs() {
        let kind = QuestionKind::matching(Vec::<(String, String)>::new());
        assert_eq!(kind.validate(), Err(QuestionError::EmptyPairs));
    }

    #[test]
    fn matching_keys_must_differ_after_case_folding() {
        let err = Question::new(
            "Match the bodies",
            QuestionKind::matching([("Sun", "Star"), (" sun", "Moon")]),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::DuplicateMatchKey(_)));
    }

    #[test]
    fn options_must_differ_after_case_folding() {
        let single = QuestionKind::single_choice(vec!["march", "March "], 1);
        assert_eq!(
            single.validate(),
            Err(QuestionError::DuplicateOption("March ".into()))
        );

        let multi = QuestionKind::multiple_choice(vec!["a", "b", "A"], [0]);
        assert_eq!(multi.validate(), Err(QuestionError::DuplicateOption("A".into())));

        let mut q = Question::new("Pick", QuestionKind::single_choice(vec!["a", "b"], 0)).unwrap();
        assert!(q
            .set_kind(QuestionKind::single_choice(vec!["b", "B"], 0))
            .is_err());
        assert_eq!(q.kind(), &QuestionKind::single_choice(vec!["a", "b"], 0));
    }

    #[test]
    fn invalid_edit_leaves_question_unchanged() {
        let mut q = Question::new("Rate us", QuestionKind::rating(1, 5)).unwrap();
        assert!(q.set_kind(QuestionKind::rating(3, 1)).is_err());
        assert_eq!(q.kind(), &QuestionKind::rating(1, 5));
        assert!(q.set_prompt("").is_err());
        assert_eq!(q.prompt(), "Rate us");
    }

    #[test]
    fn blank_topic_is_none() {
        let q = Question::new("Rate us", QuestionKind::rating(1, 5))
            .unwrap()
            .with_topic("  ");
        assert_eq!(q.topic(), None);
    }

    #[test]
    fn display_includes_topic_and_difficulty() {
        let q = Question::new("Capital of Ukraine?", QuestionKind::text("Kyiv", TextMatch::Exact))
            .unwrap()
            .with_topic("geography")
            .with_difficulty(Difficulty::MEDIUM);
        assert_eq!(q.to_string(), "[geography | difficulty 2] Capital of Ukraine?");
    }
}
