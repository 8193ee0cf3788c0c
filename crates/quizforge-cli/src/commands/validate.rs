//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::parser;
use quizforge_core::Difficulty;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = parser::load_banks(&bank_path)?;

    let mut total_warnings = 0;

    for bank in &banks {
        println!("Bank: {} ({} questions)", bank.name, bank.len());
        let levels: Vec<String> = (Difficulty::MIN.get()..=Difficulty::MAX.get())
            .map(|level| {
                let count = bank
                    .questions()
                    .iter()
                    .filter(|q| q.difficulty().get() == level)
                    .count();
                format!("{level}={count}")
            })
            .collect();
        println!("  levels: {}", levels.join(", "));

        let warnings = parser::validate_bank(bank);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
