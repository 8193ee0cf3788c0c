//! The `quizforge init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizforge.toml").exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write("quizforge.toml", SAMPLE_CONFIG)?;
        println!("Created quizforge.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let example_path = Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizforge validate --bank question-banks/example.toml");
    println!("  2. Run: quizforge take --bank question-banks/example.toml");
    println!("  3. Run: quizforge stats");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

default_rounds = 5
mode = "adaptive"
history_file = "./quizforge-results/history.json"
banks_dir = "./question-banks"
# seed = 42
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A small bank covering every question kind"

[[questions]]
id = "capital-france"
kind = "single_choice"
prompt = "What is the capital of France?"
topic = "geography"
difficulty = 1
options = ["Paris", "London", "Berlin"]
correct = "Paris"

[[questions]]
id = "largest-ocean"
kind = "text"
prompt = "Which ocean is the largest?"
topic = "geography"
difficulty = 1
expected = "Pacific"
match = "partial"

[[questions]]
id = "primes"
kind = "multiple_choice"
prompt = "Which of these numbers are prime?"
topic = "math"
difficulty = 2
options = ["2", "4", "7", "9"]
correct = ["2", "7"]

[[questions]]
id = "capitals-match"
kind = "matching"
prompt = "Match each country to its capital"
topic = "geography"
difficulty = 3

[questions.pairs]
Italy = "Rome"
Spain = "Madrid"
Japan = "Tokyo"

[[questions]]
id = "confidence"
kind = "rating"
prompt = "How confident do you feel about geography?"
difficulty = 2
min = 1
max = 5

[[questions]]
id = "sqrt-144"
kind = "text"
prompt = "What is the square root of 144?"
topic = "math"
difficulty = 3
expected = "12"
match = "exact"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_bank_parses() {
        let bank = quizforge_core::parser::parse_bank_str(
            EXAMPLE_BANK,
            Path::new("question-banks/example.toml"),
        )
        .unwrap();
        assert_eq!(bank.id, "example");
        assert_eq!(bank.len(), 6);
        assert!(quizforge_core::parser::validate_bank(&bank)
            .iter()
            .all(|w| w.question_id.as_deref() == Some("confidence")));
    }

    #[test]
    fn sample_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizforge.toml");
        std::fs::write(&path, SAMPLE_CONFIG).unwrap();
        let config = quizforge_core::config::load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_rounds, 5);
        assert!(config.seed.is_none());
    }
}
