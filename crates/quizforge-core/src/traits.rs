//! Seams between the session core and its collaborators.
//!
//! The core never prints, prompts, or persists anything itself. Answers come
//! in through an [`AnswerSource`] and finished records go out through a
//! [`ResultSink`].

use crate::evaluator::Answer;
use crate::model::Question;
use crate::results::SessionRecord;

// ---------------------------------------------------------------------------
// Input channel
// ---------------------------------------------------------------------------

/// Blocking channel that puts a question to the taker and returns the reply.
pub trait AnswerSource {
    /// Ask `question` and wait for the reply. `None` means the taker quit.
    fn ask(&mut self, question: &Question) -> Option<Answer>;
}

impl<F> AnswerSource for F
where
    F: FnMut(&Question) -> Option<Answer>,
{
    fn ask(&mut self, question: &Question) -> Option<Answer> {
        self(question)
    }
}

// ---------------------------------------------------------------------------
// Result sink
// ---------------------------------------------------------------------------

/// Receives finished session records for storage or statistics.
pub trait ResultSink {
    fn accept(&mut self, record: &SessionRecord) -> anyhow::Result<()>;
}

/// Scripted answer source that replays a fixed list of replies.
///
/// Returns `None` once the script runs out, which ends the session as aborted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    replies: std::collections::VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedAnswers {
    pub fn new(replies: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Prompts of the questions asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl AnswerSource for ScriptedAnswers {
    fn ask(&mut self, question: &Question) -> Option<Answer> {
        self.asked.push(question.prompt().to_string());
        self.replies.pop_front()
    }
}
