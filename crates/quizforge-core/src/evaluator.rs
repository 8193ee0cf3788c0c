//! Per-kind answer checking.
//!
//! Evaluation is total: any malformed input (wrong answer shape, non-numeric
//! text, out-of-range index) yields `false`, so a session never fails because
//! of what the taker typed.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Question, QuestionKind, TextMatch};

/// Raw input returned by the ask channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// A line of text (also used for indices and ratings).
    Text(String),
    /// Proposed left-key → right-value pairs for matching questions.
    Pairs(BTreeMap<String, String>),
}

impl Answer {
    pub fn text(s: impl Into<String>) -> Self {
        Answer::Text(s.into())
    }

    pub fn pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Answer::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Judge `answer` against `question`.
pub fn evaluate(question: &Question, answer: &Answer) -> bool {
    match (question.kind(), answer) {
        (QuestionKind::Text { expected, strategy }, Answer::Text(input)) => {
            strategy.matches(expected, input)
        }
        (
            QuestionKind::SingleChoice {
                options,
                correct_index,
            },
            Answer::Text(input),
        ) => check_single_choice(options.len(), *correct_index, input),
        (
            QuestionKind::MultipleChoice {
                options,
                correct_indices,
            },
            Answer::Text(input),
        ) => check_multiple_choice(options.len(), correct_indices, input),
        (QuestionKind::Rating { min, max }, Answer::Text(input)) => {
            check_rating(*min, *max, input)
        }
        (QuestionKind::Matching { pairs }, Answer::Pairs(proposed)) => {
            check_matching(pairs, proposed)
        }
        _ => false,
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

impl TextMatch {
    /// Compare a taker's input against the expected answer.
    pub fn matches(self, expected: &str, input: &str) -> bool {
        let expected = normalize(expected);
        let input = normalize(input);
        match self {
            TextMatch::Exact => input == expected,
            TextMatch::Partial => {
                input == expected || (!input.is_empty() && expected.contains(&input))
            }
        }
    }
}

/// Parse a 1-based option number into a 0-based index within `len`.
fn parse_option_index(raw: &str, len: usize) -> Option<usize> {
    let number: usize = raw.trim().parse().ok()?;
    let index = number.checked_sub(1)?;
    (index < len).then_some(index)
}

fn check_single_choice(len: usize, correct_index: usize, input: &str) -> bool {
    parse_option_index(input, len) == Some(correct_index)
}

fn check_multiple_choice(len: usize, correct: &BTreeSet<usize>, input: &str) -> bool {
    let selected: Option<BTreeSet<usize>> = input
        .split(',')
        .map(|part| parse_option_index(part, len))
        .collect();
    selected.is_some_and(|selected| &selected == correct)
}

fn check_rating(min: i64, max: i64, input: &str) -> bool {
    input
        .trim()
        .parse::<i64>()
        .is_ok_and(|value| (min..=max).contains(&value))
}

fn check_matching(pairs: &BTreeMap<String, String>, proposed: &BTreeMap<String, String>) -> bool {
    let proposed: BTreeMap<String, String> = proposed
        .iter()
        .map(|(k, v)| (normalize(k), normalize(v)))
        .collect();
    pairs.iter().all(|(left, right)| {
        proposed
            .get(&normalize(left))
            .is_some_and(|given| *given == normalize(right))
    })
}

/// Parse the console form of a matching answer (`"A=1, B=3"`).
///
/// Segments without `=` are skipped; later duplicates overwrite earlier ones.
pub fn parse_pairs(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter_map(|item| {
            let (left, right) = item.split_once('=')?;
            let left = left.trim();
            (!left.is_empty()).then(|| (left.to_string(), right.trim().to_string()))
        })
        .collect()
}
