//! The `quizforge take` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizforge_core::config::load_config_from;
use quizforge_core::engine::{SessionConfig, SessionEngine, SessionMode};
use quizforge_core::parser;
use quizforge_core::report::SessionHistory;
use quizforge_core::results::SessionRecord;
use quizforge_core::traits::ResultSink;

use crate::console::{ConsoleAsker, ConsoleReporter};

/// Arguments of `quizforge take`.
pub struct TakeArgs {
    pub bank: PathBuf,
    pub rounds: Option<usize>,
    pub mode: Option<String>,
    pub seed: Option<u64>,
    pub topic: Option<String>,
    pub history: Option<PathBuf>,
    pub no_save: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: TakeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    // Bare bank names resolve against the configured banks directory
    let bank_path = if args.bank.exists() || args.bank.is_absolute() {
        args.bank
    } else {
        let candidate = config.banks_dir.join(&args.bank);
        if candidate.exists() {
            candidate
        } else {
            args.bank
        }
    };
    let bank = parser::parse_bank(&bank_path)?;

    let pool = match &args.topic {
        Some(topic) => {
            let filtered = bank.filter_by_topic(topic);
            anyhow::ensure!(
                !filtered.is_empty(),
                "bank '{}' has no questions with topic '{}'",
                bank.name,
                topic
            );
            filtered
        }
        None => bank.questions().to_vec(),
    };

    let rounds = args.rounds.unwrap_or(config.default_rounds);
    anyhow::ensure!(rounds >= 1, "rounds must be at least 1");

    let mode = match &args.mode {
        Some(m) => m.parse::<SessionMode>().map_err(anyhow::Error::msg)?,
        None => config.mode,
    };

    let session_config = SessionConfig {
        mode,
        bank_id: Some(bank.id.clone()),
    };
    let mut engine = match args.seed.or(config.seed) {
        Some(seed) => SessionEngine::seeded(seed, session_config),
        None => SessionEngine::new(StdRng::from_os_rng(), session_config),
    };

    println!(
        "quizforge — {} ({} questions, {} rounds, {} mode)",
        bank.name,
        pool.len(),
        rounds,
        mode
    );
    println!("Press Ctrl-D to quit.");

    let stdin = std::io::stdin();
    let mut asker = ConsoleAsker::new(stdin.lock(), std::io::stdout());
    let record = engine.run(&pool, rounds, &mut asker, &ConsoleReporter)?;

    print_breakdown(&record);

    if !record.outcome.is_finished() {
        println!("Session aborted, nothing recorded.");
        return Ok(());
    }
    if args.no_save {
        return Ok(());
    }

    let history_path = args.history.unwrap_or(config.history_file);
    let mut history = SessionHistory::load_or_default(&history_path)?;
    history.accept(&record)?;
    history
        .save_json(&history_path)
        .with_context(|| format!("failed to record session {}", record.id))?;
    eprintln!("Session saved to: {}", history_path.display());

    Ok(())
}

fn print_breakdown(record: &SessionRecord) {
    if record.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Topic", "Difficulty", "Level", "Result", "Time"]);

    for (i, round) in record.rounds.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&round.question_id),
            Cell::new(round.topic.as_deref().unwrap_or("-")),
            Cell::new(round.difficulty),
            Cell::new(round.level),
            Cell::new(if round.correct { "correct" } else { "wrong" }),
            Cell::new(format!("{:.1}s", round.elapsed().as_secs_f64())),
        ]);
    }

    println!("\n{table}");
}
