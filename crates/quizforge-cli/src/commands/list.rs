//! The `quizforge list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizforge_core::bank::Library;
use quizforge_core::parser;
use quizforge_core::Question;

pub fn execute(bank_path: PathBuf, search: Option<String>, sort: Option<String>) -> Result<()> {
    let mut library = Library::from_banks(parser::load_banks(&bank_path)?);

    match sort.as_deref() {
        None => {}
        Some("prompt") => library.banks_mut().iter_mut().for_each(|b| b.sort_by_prompt()),
        Some("difficulty") => library
            .banks_mut()
            .iter_mut()
            .for_each(|b| b.sort_by_difficulty()),
        Some(other) => anyhow::bail!("unknown sort order '{other}' (expected prompt or difficulty)"),
    }

    let rows: Vec<(&str, &Question)> = match &search {
        Some(keyword) => library
            .global_search(keyword)
            .into_iter()
            .map(|hit| (hit.bank_id, hit.question))
            .collect(),
        None => library
            .banks()
            .iter()
            .flat_map(|b| b.questions().iter().map(move |q| (b.id.as_str(), q)))
            .collect(),
    };

    if rows.is_empty() {
        match &search {
            Some(keyword) => println!("No questions match '{keyword}'."),
            None => println!("No questions found."),
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Bank", "ID", "Kind", "Topic", "Level", "Prompt"]);
    for (bank_id, q) in &rows {
        table.add_row(vec![
            Cell::new(bank_id),
            Cell::new(q.id()),
            Cell::new(q.kind().tag()),
            Cell::new(q.topic().unwrap_or("-")),
            Cell::new(q.difficulty()),
            Cell::new(q.prompt()),
        ]);
    }

    println!("{table}");
    println!("{} question(s).", rows.len());

    Ok(())
}
