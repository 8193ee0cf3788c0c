//! The `quizforge stats` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizforge_core::config::load_config_from;
use quizforge_core::report::SessionHistory;
use quizforge_core::statistics::AggregateStats;
use quizforge_report::html::write_html_report;

pub fn execute(
    history_path: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let history_path = match history_path {
        Some(p) => p,
        None => load_config_from(config_path.as_deref())?.history_file,
    };
    let history = SessionHistory::load_or_default(&history_path)?;
    let stats = history.stats();

    match format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&stats)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Statistics saved to: {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        "html" => {
            let path = output.unwrap_or_else(|| {
                let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
                PathBuf::from(format!("quizforge-report-{timestamp}.html"))
            });
            let title = history_path.display().to_string();
            write_html_report(&history, &title, &path)?;
            eprintln!("HTML report: {}", path.display());
        }
        "text" => print_text(&stats),
        other => anyhow::bail!("unknown format '{other}' (expected text, json or html)"),
    }

    Ok(())
}

fn print_text(stats: &AggregateStats) {
    if stats.sessions == 0 {
        println!("No sessions recorded yet.");
        return;
    }

    println!(
        "Sessions: {} | Questions: {} | Accuracy: {:.1}%",
        stats.sessions,
        stats.total_rounds,
        stats.accuracy * 100.0
    );
    println!(
        "Average score: {:.2} | Best score: {} | Average final level: {:.2}",
        stats.avg_score, stats.best_score, stats.avg_final_level
    );
    println!(
        "Average session: {:.1}s | Average per question: {:.1}s",
        stats.avg_session_ms as f64 / 1000.0,
        stats.avg_question_ms as f64 / 1000.0
    );

    let mut table = Table::new();
    table.set_header(vec!["Slice", "Asked", "Correct", "Accuracy"]);
    for (topic, s) in &stats.per_topic {
        table.add_row(vec![
            Cell::new(format!("topic: {topic}")),
            Cell::new(s.asked),
            Cell::new(s.correct),
            Cell::new(format!("{:.1}%", s.accuracy * 100.0)),
        ]);
    }
    for (level, s) in &stats.per_difficulty {
        table.add_row(vec![
            Cell::new(format!("level {level}")),
            Cell::new(s.asked),
            Cell::new(s.correct),
            Cell::new(format!("{:.1}%", s.accuracy * 100.0)),
        ]);
    }

    println!("\n{table}");
}
