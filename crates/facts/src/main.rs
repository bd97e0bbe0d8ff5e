//! # Facts CLI (`facts`)
//!
//! Runs the fact HTTP server and administers the fact database.
//!
//! ## Usage
//!
//! ```bash
//! facts --config ./config/facts.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `facts init` | Create the SQLite database and schema |
//! | `facts serve` | Start the HTTP server |
//! | `facts list` | List all facts |
//! | `facts get <id>` | Show one fact by UUID |
//! | `facts add` | Create a fact |
//! | `facts update <id>` | Replace a fact's fields |
//! | `facts delete <id>` | Delete a fact |
//! | `facts search <query>` | Title substring search |
//! | `facts autocomplete <partial>` | Title prefix suggestions |
//! | `facts random` | Show a random fact |
//! | `facts title <title>` | Exact title lookup, ignoring case |

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use facts::{commands, config, logging, migrate, server, FactInput};

/// Facts — store, search, and serve short facts over HTTP.
#[derive(Parser)]
#[command(
    name = "facts",
    about = "Facts — store, search, and serve short facts over HTTP",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/facts.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it multiple times is safe.
    Init,

    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// List all facts in creation order.
    List,

    /// Show a fact by its UUID.
    Get {
        /// Fact UUID.
        id: String,
    },

    /// Create a fact.
    Add(FactArgs),

    /// Replace the title, body, tag, and source URL of a fact.
    Update {
        /// Fact UUID.
        id: String,

        #[command(flatten)]
        fact: FactArgs,
    },

    /// Delete a fact permanently.
    Delete {
        /// Fact UUID.
        id: String,
    },

    /// Find facts whose title contains a string, ignoring case.
    Search {
        /// Substring to look for.
        query: String,
    },

    /// Suggest titles starting with a prefix, ignoring case.
    Autocomplete {
        /// Title prefix.
        partial: String,

        /// Zero-based page number.
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Titles per page.
        #[arg(long, default_value_t = 10)]
        size: u32,
    },

    /// Show a random fact.
    Random,

    /// Show the fact with an exact title, ignoring case.
    Title {
        /// Title to match.
        title: String,
    },
}

/// Fields of a fact as given on the command line.
#[derive(Args)]
struct FactArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    body: String,

    #[arg(long)]
    tag: String,

    #[arg(long)]
    source_url: Option<String>,
}

impl From<FactArgs> for FactInput {
    fn from(args: FactArgs) -> Self {
        FactInput::new(args.title, args.body, args.tag, args.source_url)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    logging::init(&cfg.logging)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::List => {
            commands::run_list(&cfg).await?;
        }
        Commands::Get { id } => {
            commands::run_get(&cfg, &id).await?;
        }
        Commands::Add(fact) => {
            commands::run_add(&cfg, fact.into()).await?;
        }
        Commands::Update { id, fact } => {
            commands::run_update(&cfg, &id, fact.into()).await?;
        }
        Commands::Delete { id } => {
            commands::run_delete(&cfg, &id).await?;
        }
        Commands::Search { query } => {
            commands::run_search(&cfg, &query).await?;
        }
        Commands::Autocomplete {
            partial,
            page,
            size,
        } => {
            commands::run_autocomplete(&cfg, &partial, page, size).await?;
        }
        Commands::Random => {
            commands::run_random(&cfg).await?;
        }
        Commands::Title { title } => {
            commands::run_title(&cfg, &title).await?;
        }
    }

    Ok(())
}
