//! The `agora` command-line tool.
//!
//! Asks the coordinator questions, runs the demo scenarios and inspects the
//! record store. Configuration comes from `agora.toml`; logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use agora_memory::RecordStore;
use agora_orchestrator::{run_scenarios, Coordinator, KnowledgeBase};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod output;

use config::AgoraConfig;

#[derive(Parser)]
#[command(name = "agora", about = "Agora — multi-agent research demo with persistent memory")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "agora.toml")]
    config: PathBuf,

    /// Directory holding the record store (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the coordinator a question
    Ask {
        /// Question words; read from stdin when omitted
        query: Vec<String>,
    },
    /// Run the canonical demo scenarios and write their reports
    Scenarios {
        /// Directory for the report files
        #[arg(long, default_value = "outputs")]
        out: PathBuf,
    },
    /// Inspect the record store
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
}

#[derive(Subcommand)]
enum MemoryAction {
    /// List every record in insertion order
    List,
    /// Hybrid search over the records
    Search {
        query: Vec<String>,
        /// Maximum number of results (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AgoraConfig::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    init_tracing(config.log.json);

    let store_path = config.store_path();
    let store = RecordStore::open(&store_path)
        .with_context(|| format!("Failed to open record store '{}'", store_path.display()))?;

    match cli.command {
        Commands::Ask { query } => {
            let query = if query.is_empty() {
                prompt("Enter your question: ")?
            } else {
                query.join(" ")
            };
            let mut coordinator = Coordinator::new(store, KnowledgeBase::builtin());
            let outcome = coordinator
                .ask(&query)
                .context("Failed to answer query")?;
            println!("{}", output::render_outcome(&outcome));
        }
        Commands::Scenarios { out } => {
            let mut coordinator = Coordinator::new(store, KnowledgeBase::builtin());
            info!(out = %out.display(), "Running demo scenarios");
            let written = run_scenarios(&mut coordinator, &out)
                .with_context(|| format!("Failed to run scenarios into '{}'", out.display()))?;
            for (file_name, trace_len) in written {
                println!("Generated {file_name} with {trace_len} trace entries.");
            }
        }
        Commands::Memory { action } => match action {
            MemoryAction::List => {
                println!("{}", output::render_records(store.all(), "No records."));
            }
            MemoryAction::Search { query, limit } => {
                let limit = limit.unwrap_or(config.search.default_limit);
                let hits = store.search(&query.join(" "), limit);
                println!("{}", output::render_records(hits, "No matches."));
            }
        },
    }

    Ok(())
}

/// Logs go to stderr so reports on stdout stay clean.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
