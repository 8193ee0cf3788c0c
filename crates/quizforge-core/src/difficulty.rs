//! Adaptive difficulty state machine.

use crate::model::Difficulty;

/// Tracks the working difficulty of one session.
///
/// Starts at [`Difficulty::MIN`], moves up one level after a correct answer
/// and down one level after an incorrect one, saturating at both ends.
#[derive(Debug, Clone, Default)]
pub struct DifficultyController {
    level: Difficulty,
}

impl DifficultyController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> Difficulty {
        self.level
    }

    /// Apply the outcome of one round and return the new level.
    pub fn record(&mut self, correct: bool) -> Difficulty {
        self.level = if correct {
            self.level.harder()
        } else {
            self.level.easier()
        };
        self.level
    }

    pub fn reset(&mut self) {
        self.level = Difficulty::MIN;
    }
}
