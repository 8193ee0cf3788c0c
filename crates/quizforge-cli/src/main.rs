//! quizforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod console;

#[derive(Parser)]
#[command(
    name = "quizforge",
    version,
    about = "Adaptive quiz sessions from TOML question banks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz session in the terminal
    Take {
        /// Path to a .toml question bank
        #[arg(long)]
        bank: PathBuf,

        /// Number of rounds (default from config)
        #[arg(long)]
        rounds: Option<usize>,

        /// Session mode: adaptive, linear
        #[arg(long)]
        mode: Option<String>,

        /// Random seed for reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Only ask questions with this topic
        #[arg(long)]
        topic: Option<String>,

        /// History file (default from config)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Do not record the session in the history
        #[arg(long)]
        no_save: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List the questions in a bank or directory of banks
    List {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,

        /// Only show questions whose prompt contains this keyword
        #[arg(long)]
        search: Option<String>,

        /// Sort order: prompt, difficulty
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show statistics over recorded sessions
    Stats {
        /// History file (default from config)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Output format: text, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Output file for json/html (stdout for json when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            rounds,
            mode,
            seed,
            topic,
            history,
            no_save,
            config,
        } => commands::take::execute(commands::take::TakeArgs {
            bank,
            rounds,
            mode,
            seed,
            topic,
            history,
            no_save,
            config,
        }),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::List { bank, search, sort } => commands::list::execute(bank, search, sort),
        Commands::Stats {
            history,
            format,
            output,
            config,
        } => commands::stats::execute(history, format, output, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
