//! # Campus FAQ CLI (`cfaq`)
//!
//! The `cfaq` binary is the operational interface for the FAQ service. It
//! provides commands for database initialization, one-shot queries,
//! language detection, triage-queue management, and starting the HTTP
//! server.
//!
//! ## Usage
//!
//! ```bash
//! cfaq --config ./config/cfaq.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cfaq init` | Create the SQLite database and run schema migrations |
//! | `cfaq ask "<query>"` | Run a query through the full answering pipeline |
//! | `cfaq detect "<text>"` | Print the detected language of a text |
//! | `cfaq languages` | List supported language codes and names |
//! | `cfaq corpus` | List the FAQ corpus entries |
//! | `cfaq queries list` | List triage records |
//! | `cfaq queries resolve <id> <response>` | Resolve a triage record |
//! | `cfaq queries published` | List published resolved records |
//! | `cfaq serve http` | Start the JSON HTTP server |

mod bridge;
mod cache;
mod config;
mod corpus;
mod db;
mod lang;
mod matcher;
mod migrate;
mod models;
mod pipeline;
mod score;
mod server;
mod text;
mod translate;
mod triage;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::bridge::LanguageBridge;
use crate::corpus::Corpus;
use crate::models::QueryStatus;

/// Campus FAQ CLI — a multilingual campus FAQ answering and triage service.
#[derive(Parser)]
#[command(
    name = "cfaq",
    about = "Campus FAQ — a multilingual FAQ answering and triage service",
    version,
    long_about = "Campus FAQ scores questions against a fixed FAQ corpus, answers confident \
    matches in the user's language, and routes unconfident queries to a human triage queue \
    exposed over a JSON HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/cfaq.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the triage queue table.
    /// This command is idempotent — running it multiple times is safe.
    Init,

    /// Run one query through the answering pipeline.
    ///
    /// Detects (or accepts) the query language, translates to English,
    /// matches against the corpus, and prints the answer — or the
    /// deferred-response message when the query is escalated to triage.
    Ask {
        /// The question to answer.
        query: String,

        /// Language hint (ISO code, e.g. `es`). Detected when omitted.
        #[arg(long)]
        language: Option<String>,

        /// Email recorded with the triage record if the query escalates.
        #[arg(long)]
        email: Option<String>,
    },

    /// Detect the language of a text without answering it.
    Detect {
        /// Text to classify.
        text: String,
    },

    /// List supported language codes and display names.
    Languages,

    /// List the FAQ corpus entries in match order.
    Corpus,

    /// Manage the triage queue.
    Queries {
        #[command(subcommand)]
        action: QueriesAction,
    },

    /// Start the JSON HTTP server.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },
}

/// Triage queue subcommands.
#[derive(Subcommand)]
enum QueriesAction {
    /// List triage records, newest first.
    List {
        /// Filter by status: `open` or `resolved`.
        #[arg(long)]
        status: Option<String>,
    },

    /// Resolve a record: store the response and publish it.
    Resolve {
        /// Record id.
        id: String,
        /// Human-authored response text.
        response: String,
    },

    /// List published resolved records (the "latest updates" feed).
    Published,
}

/// Server subcommands.
#[derive(Subcommand)]
enum ServeService {
    /// Serve the JSON HTTP API on `[server].bind`.
    Http,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that work without a config file
    match &cli.command {
        Commands::Detect { text } => {
            println!("{}", lang::detect_language(text));
            return Ok(());
        }
        Commands::Languages => {
            for (code, name) in lang::SUPPORTED_LANGUAGES {
                println!("{}  {}", code, name);
            }
            return Ok(());
        }
        Commands::Corpus => {
            // Use config if available, otherwise a minimal default
            let cfg =
                config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
            let corpus = Corpus::load(&cfg)?;
            for (i, entry) in corpus.entries().iter().enumerate() {
                println!("{}. {}", i + 1, entry.question);
                println!("   keywords: {}", entry.keywords.join(", "));
            }
            println!("{} entries", corpus.len());
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Ask {
            query,
            language,
            email,
        } => {
            let corpus = Corpus::load(&cfg)?;
            let bridge = LanguageBridge::new(&cfg);
            let outcome = pipeline::answer_query(
                &cfg,
                &corpus,
                &bridge,
                &query,
                language.as_deref(),
                email.as_deref(),
            )
            .await?;

            println!("{}", outcome.answer);
            if let Some(matched) = &outcome.matched_question {
                println!("matched: {}", matched);
            }
            if outcome.escalated {
                println!("status: escalated to triage");
            }
            if outcome.translated {
                println!(
                    "language: {} (detected: {})",
                    outcome.language, outcome.detected_language
                );
            }
        }
        Commands::Queries { action } => match action {
            QueriesAction::List { status } => {
                let status = match status.as_deref() {
                    None => None,
                    Some(s) => Some(
                        QueryStatus::parse(s)
                            .ok_or_else(|| anyhow::anyhow!("invalid status filter: {}", s))?,
                    ),
                };
                let records = triage::list(&cfg, status).await?;
                for record in &records {
                    println!(
                        "[{}] {} ({})",
                        record.status.as_str(),
                        record.question,
                        record.id
                    );
                    if let Some(response) = &record.response {
                        println!("    response: {}", response);
                    }
                }
                println!("{} records", records.len());
            }
            QueriesAction::Resolve { id, response } => {
                let record = triage::resolve(&cfg, &id, &response).await?;
                println!(
                    "Resolved {} -> published={} status={}",
                    record.id,
                    record.published,
                    record.status.as_str()
                );
            }
            QueriesAction::Published => {
                let records = triage::list_published(&cfg, None).await?;
                for record in &records {
                    println!("{}", record.question);
                    if let Some(response) = &record.response {
                        println!("    {}", response);
                    }
                }
                println!("{} records", records.len());
            }
        },
        Commands::Serve { service } => match service {
            ServeService::Http => {
                server::run_server(&cfg).await?;
            }
        },
        Commands::Detect { .. } | Commands::Languages | Commands::Corpus => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
