//! Terminal input channel and progress output.

use std::io::{BufRead, Write};

use quizforge_core::engine::ProgressReporter;
use quizforge_core::evaluator::parse_pairs;
use quizforge_core::model::{Difficulty, Question, QuestionKind};
use quizforge_core::results::{RoundResult, SessionRecord};
use quizforge_core::traits::AnswerSource;
use quizforge_core::Answer;

/// Asks questions on a line-oriented terminal.
///
/// End of input (or a read error) ends the session.
pub struct ConsoleAsker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleAsker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn render(&mut self, question: &Question) -> std::io::Result<()> {
        let out = &mut self.output;
        writeln!(out)?;
        writeln!(out, "{}", question.prompt())?;
        match question.kind() {
            QuestionKind::Text { .. } => {}
            QuestionKind::SingleChoice { options, .. } => {
                for (i, option) in options.iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, option)?;
                }
                writeln!(out, "(enter the option number)")?;
            }
            QuestionKind::MultipleChoice { options, .. } => {
                for (i, option) in options.iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, option)?;
                }
                writeln!(out, "(enter option numbers separated by commas, e.g. 1,3)")?;
            }
            QuestionKind::Rating { min, max } => {
                writeln!(out, "(rate from {min} to {max})")?;
            }
            QuestionKind::Matching { pairs } => {
                let keys: Vec<&str> = pairs.keys().map(String::as_str).collect();
                let mut values: Vec<&str> = pairs.values().map(String::as_str).collect();
                values.sort_unstable();
                writeln!(out, "  left:  {}", keys.join(", "))?;
                writeln!(out, "  right: {}", values.join(", "))?;
                writeln!(out, "(enter pairs as key=value separated by commas, e.g. A=1,B=2)")?;
            }
        }
        write!(out, "> ")?;
        out.flush()
    }
}

impl<R: BufRead, W: Write> AnswerSource for ConsoleAsker<R, W> {
    fn ask(&mut self, question: &Question) -> Option<Answer> {
        if let Err(e) = self.render(question) {
            tracing::warn!("failed to write question: {}", e);
            return None;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let line = line.trim_end_matches(['\r', '\n']);
                Some(match question.kind() {
                    QuestionKind::Matching { .. } => Answer::Pairs(parse_pairs(line)),
                    _ => Answer::text(line),
                })
            }
            Err(e) => {
                tracing::warn!("failed to read answer: {}", e);
                None
            }
        }
    }
}

/// Console progress reporter.
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_round_start(&self, round: usize, total: usize, question: &Question, level: Difficulty) {
        let topic = question.topic().unwrap_or("general");
        println!("\nQuestion {round}/{total} [{topic}, level {level}]");
    }

    fn on_round_complete(&self, _round: usize, result: &RoundResult) {
        if result.correct {
            println!("Correct! ({:.1}s)", result.elapsed().as_secs_f64());
        } else {
            println!("Incorrect. ({:.1}s)", result.elapsed().as_secs_f64());
        }
    }

    fn on_session_complete(&self, record: &SessionRecord) {
        println!(
            "\nScore: {}/{} | final level {} | {:.1}s",
            record.correct_count(),
            record.len(),
            record.final_level,
            record.total_elapsed().as_secs_f64()
        );
    }
}
