//! TOML question bank parser and writer.
//!
//! Loads question banks from TOML files and directories, validates them, and
//! writes them back out.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::error::QuestionError;
use crate::model::{Difficulty, Question, QuestionKind, TextMatch};

/// Intermediate TOML structure for bank files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
}

/// Correct answer given either as one option or a list of options.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum TomlCorrect {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TomlQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    kind: String,
    prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    difficulty: Option<i64>,

    // text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected: Option<String>,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    strategy: Option<String>,

    // single_choice / multiple_choice
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct: Option<TomlCorrect>,

    // rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<i64>,

    // matching
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pairs: BTreeMap<String, String>,
}

impl TomlQuestion {
    fn into_question(self) -> Result<Question, QuestionError> {
        let kind = match self.kind.trim().to_lowercase().as_str() {
            "text" => {
                let expected = self.expected.ok_or(QuestionError::MissingField {
                    kind: "text",
                    field: "expected",
                })?;
                let strategy = self
                    .strategy
                    .as_deref()
                    .map(str::parse::<TextMatch>)
                    .transpose()?
                    .unwrap_or_default();
                QuestionKind::text(expected, strategy)
            }
            "single_choice" | "choice" => {
                let correct = match self.correct {
                    Some(TomlCorrect::One(c)) => c,
                    Some(TomlCorrect::Many(mut list)) if list.len() == 1 => list.remove(0),
                    _ => {
                        return Err(QuestionError::MissingField {
                            kind: "single_choice",
                            field: "correct",
                        })
                    }
                };
                if self.options.is_empty() {
                    return Err(QuestionError::EmptyOptions);
                }
                QuestionKind::single_choice_by_text(self.options, &correct)?
            }
            "multiple_choice" => {
                let correct = match self.correct {
                    Some(TomlCorrect::One(c)) => vec![c],
                    Some(TomlCorrect::Many(list)) => list,
                    None => {
                        return Err(QuestionError::MissingField {
                            kind: "multiple_choice",
                            field: "correct",
                        })
                    }
                };
                if self.options.is_empty() {
                    return Err(QuestionError::EmptyOptions);
                }
                let correct: Vec<&str> = correct.iter().map(String::as_str).collect();
                QuestionKind::multiple_choice_by_text(self.options, &correct)?
            }
            "rating" => {
                let min = self.min.ok_or(QuestionError::MissingField {
                    kind: "rating",
                    field: "min",
                })?;
                let max = self.max.ok_or(QuestionError::MissingField {
                    kind: "rating",
                    field: "max",
                })?;
                QuestionKind::rating(min, max)
            }
            "matching" => QuestionKind::Matching { pairs: self.pairs },
            other => return Err(QuestionError::UnknownKind(other.to_string())),
        };

        let difficulty = self
            .difficulty
            .map(Difficulty::new)
            .transpose()?
            .unwrap_or_default();

        let mut question = Question::new(self.prompt, kind)?.with_difficulty(difficulty);
        if let Some(id) = self.id {
            question = question.with_id(id);
        }
        if let Some(topic) = self.topic {
            question = question.with_topic(topic);
        }
        Ok(question)
    }

    fn from_question(question: &Question) -> Self {
        let mut out = TomlQuestion {
            id: Some(question.id().to_string()),
            kind: question.kind().tag().to_string(),
            prompt: question.prompt().to_string(),
            topic: question.topic().map(str::to_string),
            difficulty: Some(i64::from(question.difficulty().get())),
            ..Default::default()
        };
        match question.kind() {
            QuestionKind::Text { expected, strategy } => {
                out.expected = Some(expected.clone());
                out.strategy = Some(strategy.to_string());
            }
            QuestionKind::SingleChoice {
                options,
                correct_index,
            } => {
                out.correct = Some(TomlCorrect::One(options[*correct_index].clone()));
                out.options = options.clone();
            }
            QuestionKind::MultipleChoice {
                options,
                correct_indices,
            } => {
                out.correct = Some(TomlCorrect::Many(
                    correct_indices.iter().map(|&i| options[i].clone()).collect(),
                ));
                out.options = options.clone();
            }
            QuestionKind::Rating { min, max } => {
                out.min = Some(*min);
                out.max = Some(*max);
            }
            QuestionKind::Matching { pairs } => {
                out.pairs = pairs.clone();
            }
        }
        out
    }
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let label = q.id.clone().unwrap_or_else(|| format!("#{}", i + 1));
            q.into_question().with_context(|| {
                format!("invalid question {label} in {}", source_path.display())
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank::new(parsed.bank.id, parsed.bank.name)
        .with_description(parsed.bank.description)
        .with_questions(questions))
}

/// Render a bank in the TOML file format.
pub fn bank_to_toml(bank: &QuestionBank) -> Result<String> {
    let file = TomlBankFile {
        bank: TomlBankHeader {
            id: bank.id.clone(),
            name: bank.name.clone(),
            description: bank.description.clone(),
        },
        questions: bank
            .questions()
            .iter()
            .map(TomlQuestion::from_question)
            .collect(),
    };
    toml::to_string_pretty(&file).context("failed to serialize question bank")
}

/// Write a bank to `path`, creating parent directories.
pub fn write_bank(bank: &QuestionBank, path: &Path) -> Result<()> {
    let content = bank_to_toml(bank)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write question bank to {}", path.display()))?;
    Ok(())
}

/// Recursively load all `.toml` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a single bank file, or every bank under a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_bank(path)?])
    }
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for issues that parse cleanly but hurt sessions.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
        return warnings;
    }

    // Duplicate IDs make session records ambiguous
    let mut seen_ids = HashSet::new();
    for q in bank.questions() {
        if !seen_ids.insert(q.id()) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id().to_string()),
                message: format!("duplicate question ID: {}", q.id()),
            });
        }
    }

    // Adaptive sessions fall back when a level is empty
    for level in 1..=3 {
        if !bank.questions().iter().any(|q| q.difficulty().get() == level) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("no questions at difficulty {level}"),
            });
        }
    }

    for q in bank.questions() {
        match q.kind() {
            QuestionKind::Rating { .. } => warnings.push(ValidationWarning {
                question_id: Some(q.id().to_string()),
                message: "rating question accepts every value in its scale".into(),
            }),
            QuestionKind::SingleChoice { options, .. } if options.len() == 1 => {
                warnings.push(ValidationWarning {
                    question_id: Some(q.id().to_string()),
                    message: "choice question has only one option".into(),
                })
            }
            _ => {}
        }
    }

    warnings
}
