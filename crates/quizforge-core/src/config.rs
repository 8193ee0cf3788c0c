//! quizforge configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::SessionMode;

/// Top-level quizforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Rounds per session when none are given on the command line.
    #[serde(default = "default_rounds")]
    pub default_rounds: usize,
    /// Session mode when none is given on the command line.
    #[serde(default)]
    pub mode: SessionMode,
    /// Where finished sessions are recorded.
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
    /// Directory searched for question banks.
    #[serde(default = "default_banks_dir")]
    pub banks_dir: PathBuf,
    /// Fixed random seed for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_rounds() -> usize {
    5
}
fn default_history_file() -> PathBuf {
    PathBuf::from("./quizforge-results/history.json")
}
fn default_banks_dir() -> PathBuf {
    PathBuf::from("./question-banks")
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            default_rounds: default_rounds(),
            mode: SessionMode::default(),
            history_file: default_history_file(),
            banks_dir: default_banks_dir(),
            seed: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied as-is and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Environment variable override: `QUIZFORGE_HISTORY`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    if let Ok(history) = std::env::var("QUIZFORGE_HISTORY") {
        config.history_file = PathBuf::from(history);
    }

    config.history_file = resolve_path(&config.history_file);
    config.banks_dir = resolve_path(&config.banks_dir);

    anyhow::ensure!(config.default_rounds >= 1, "default_rounds must be at least 1");

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}
