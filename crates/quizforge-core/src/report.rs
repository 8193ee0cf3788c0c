//! Session history with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::results::SessionRecord;
use crate::statistics::{AggregateStats, ScoringAggregator};
use crate::traits::ResultSink;

/// Every finished session, in the order they were recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    pub sessions: Vec<SessionRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the history as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize history")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write history to {}", path.display()))?;
        Ok(())
    }

    /// Load a history from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read history from {}", path.display()))?;
        let history: SessionHistory =
            serde_json::from_str(&content).context("failed to parse history JSON")?;
        Ok(history)
    }

    /// Load a history, or start an empty one if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_json(path)
        } else {
            tracing::debug!("no history at {}, starting fresh", path.display());
            Ok(Self::default())
        }
    }

    /// Sessions recorded against a particular bank.
    pub fn for_bank<'a>(&'a self, bank_id: &'a str) -> impl Iterator<Item = &'a SessionRecord> + 'a {
        self.sessions
            .iter()
            .filter(move |s| s.bank_id.as_deref() == Some(bank_id))
    }

    pub fn stats(&self) -> AggregateStats {
        ScoringAggregator::aggregate(&self.sessions)
    }
}

impl ResultSink for SessionHistory {
    fn accept(&mut self, record: &SessionRecord) -> Result<()> {
        anyhow::ensure!(
            record.outcome.is_finished(),
            "aborted session {} cannot be recorded",
            record.id
        );
        self.sessions.push(record.clone());
        Ok(())
    }
}
