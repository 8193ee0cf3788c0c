//! Question banks and the bank library.
//!
//! A [`QuestionBank`] is the editable, persisted pool that sessions draw from.
//! A [`Library`] groups several banks and supports lookups across them.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::BankError;
use crate::model::{Difficulty, Question, QuestionId, QuestionKind};

/// A named collection of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this bank.
    pub description: String,
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            questions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn add(&mut self, question: Question) {
        tracing::debug!("bank '{}': added question {}", self.id, question.id());
        self.questions.push(question);
    }

    pub fn remove(&mut self, index: usize) -> Result<Question, BankError> {
        self.check_index(index)?;
        Ok(self.questions.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn find_by_id(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    pub fn edit_prompt(&mut self, index: usize, prompt: impl Into<String>) -> Result<(), BankError> {
        self.question_mut(index)?.set_prompt(prompt)?;
        Ok(())
    }

    pub fn edit_topic(&mut self, index: usize, topic: Option<String>) -> Result<(), BankError> {
        self.question_mut(index)?.set_topic(topic);
        Ok(())
    }

    pub fn edit_difficulty(&mut self, index: usize, difficulty: Difficulty) -> Result<(), BankError> {
        self.question_mut(index)?.set_difficulty(difficulty);
        Ok(())
    }

    /// Replace the payload (and with it the correct answer) of a question.
    pub fn replace_kind(&mut self, index: usize, kind: QuestionKind) -> Result<(), BankError> {
        self.question_mut(index)?.set_kind(kind)?;
        Ok(())
    }

    /// Questions whose prompt contains `keyword`, case-insensitively.
    pub fn search(&self, keyword: &str) -> Vec<&Question> {
        let keyword = keyword.to_lowercase();
        self.questions
            .iter()
            .filter(|q| q.prompt().to_lowercase().contains(&keyword))
            .collect()
    }

    /// Questions tagged with `topic`, case-insensitively.
    pub fn filter_by_topic(&self, topic: &str) -> Vec<Question> {
        let topic = topic.to_lowercase();
        self.questions
            .iter()
            .filter(|q| q.topic().is_some_and(|t| t.to_lowercase() == topic))
            .cloned()
            .collect()
    }

    pub fn sort_by_prompt(&mut self) {
        self.questions
            .sort_by_cached_key(|q| q.prompt().to_lowercase());
    }

    /// Stable sort, so equal difficulties keep their relative order.
    pub fn sort_by_difficulty(&mut self) {
        self.questions.sort_by_key(|q| q.difficulty());
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.questions.shuffle(rng);
    }

    /// Highest difficulty present in the bank.
    pub fn max_difficulty(&self) -> Option<Difficulty> {
        self.questions.iter().map(Question::difficulty).max()
    }

    fn check_index(&self, index: usize) -> Result<(), BankError> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(BankError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            })
        }
    }

    fn question_mut(&mut self, index: usize) -> Result<&mut Question, BankError> {
        self.check_index(index)?;
        Ok(&mut self.questions[index])
    }
}

/// A search hit from [`Library::global_search`].
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub bank_id: &'a str,
    pub question: &'a Question,
}

/// An ordered collection of question banks.
#[derive(Debug, Clone, Default)]
pub struct Library {
    banks: Vec<QuestionBank>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_banks(banks: Vec<QuestionBank>) -> Self {
        Self { banks }
    }

    pub fn banks(&self) -> &[QuestionBank] {
        &self.banks
    }

    pub fn banks_mut(&mut self) -> &mut [QuestionBank] {
        &mut self.banks
    }

    pub fn add(&mut self, bank: QuestionBank) {
        self.banks.push(bank);
    }

    /// Create an empty bank and return it for editing.
    pub fn create(&mut self, id: impl Into<String>, name: impl Into<String>) -> &mut QuestionBank {
        self.banks.push(QuestionBank::new(id, name));
        let last = self.banks.len() - 1;
        &mut self.banks[last]
    }

    pub fn remove(&mut self, index: usize) -> Result<QuestionBank, BankError> {
        if index < self.banks.len() {
            Ok(self.banks.remove(index))
        } else {
            Err(BankError::IndexOutOfRange {
                index,
                len: self.banks.len(),
            })
        }
    }

    /// Find a bank by name or id, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&QuestionBank> {
        let name = name.to_lowercase();
        self.banks
            .iter()
            .find(|b| b.name.to_lowercase() == name || b.id.to_lowercase() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut QuestionBank> {
        let name = name.to_lowercase();
        self.banks
            .iter_mut()
            .find(|b| b.name.to_lowercase() == name || b.id.to_lowercase() == name)
    }

    /// Search prompts across every bank.
    pub fn global_search(&self, keyword: &str) -> Vec<SearchHit<'_>> {
        self.banks
            .iter()
            .flat_map(|bank| {
                bank.search(keyword).into_iter().map(move |question| SearchHit {
                    bank_id: &bank.id,
                    question,
                })
            })
            .collect()
    }
}
