//! # Storefront Bot CLI (`sbot`)
//!
//! Runs the support assistant's HTTP server and offers commands to query
//! the assistant from a terminal.
//!
//! ## Usage
//!
//! ```bash
//! sbot --config ./config/bot.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sbot serve` | Start the HTTP API and embedded chat widget |
//! | `sbot ask "<message>"` | Print the reply to one message |
//! | `sbot search "<query>"` | Print ranked catalog products |
//! | `sbot faq <section>` | Print one FAQ section |
//! | `sbot check` | Report FAQ and catalog status |
//! | `sbot chat` | Chat from the terminal |
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=storefront_bot=debug`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storefront_bot::assistant::Assistant;
use storefront_bot::config::{self, Config};
use storefront_bot::faq::{FaqDocument, FaqSection};
use storefront_bot::{chat_cmd, check, search, server};

/// Storefront Bot: keyword-routed support assistant with FAQ answers and
/// catalog product search.
#[derive(Parser)]
#[command(
    name = "sbot",
    about = "Storefront Bot: a keyword-routed storefront support assistant",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/bot.toml`. `serve` requires the file; other
    /// commands fall back to built-in defaults when it does not exist.
    #[arg(long, global = true, default_value = "./config/bot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Loads the FAQ and catalog once, then serves `/api/chat`,
    /// `/api/products`, `/api/contact`, `/health`, and the chat widget
    /// on `[server].bind`.
    Serve,

    /// Print the assistant's reply to one message.
    Ask {
        /// The message, as a customer would type it.
        message: String,

        /// Print the raw JSON response instead of the reply text.
        #[arg(long)]
        json: bool,
    },

    /// Search the product catalog.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results (capped by `[search].max_limit`).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print one FAQ section: `shipping`, `returns`, or `care`.
    Faq {
        section: String,
    },

    /// Check that the FAQ sections and the catalog can be loaded.
    Check,

    /// Chat with the assistant from the terminal.
    ///
    /// Talks to a running server over HTTP, or answers in-process with
    /// `--local`.
    Chat {
        /// Server base URL. Defaults to `http://<server.bind>`.
        #[arg(long, conflicts_with = "local")]
        url: Option<String>,

        /// Answer in-process instead of calling a server.
        #[arg(long)]
        local: bool,
    },
}

fn init_logging(default_directive: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(default_directive),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;
    Ok(())
}

fn load_or_default(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        Ok(Config::minimal())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_directive = match cli.command {
        Commands::Serve => "storefront_bot=info",
        _ => "storefront_bot=warn",
    };
    init_logging(default_directive)?;

    match cli.command {
        Commands::Serve => {
            let cfg = config::load_config(&cli.config)?;
            server::run_server(&cfg).await?;
        }
        Commands::Ask { message, json } => {
            let cfg = load_or_default(&cli.config)?;
            let assistant = Assistant::from_config(&cfg);
            let response = assistant.reply(&message);
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.reply);
                if let Some(ui) = response.ui {
                    println!("[ui: {}]", ui.kind);
                }
            }
        }
        Commands::Search { query, limit } => {
            let cfg = load_or_default(&cli.config)?;
            search::run_search(&cfg, &query, limit)?;
        }
        Commands::Faq { section } => {
            let cfg = load_or_default(&cli.config)?;
            let Some(section) = FaqSection::parse(&section) else {
                anyhow::bail!(
                    "Unknown FAQ section: {}. Use shipping, returns, or care.",
                    section
                );
            };
            let faq = FaqDocument::load(cfg.content.faq_path())?;
            let text = faq.section(section);
            if text.is_empty() {
                println!("(section '{}' not found)", section);
            } else {
                println!("{}", text);
            }
        }
        Commands::Check => {
            let cfg = load_or_default(&cli.config)?;
            check::check_content(&cfg)?;
        }
        Commands::Chat { url, local } => {
            let cfg = load_or_default(&cli.config)?;
            chat_cmd::run_chat(&cfg, url, local).await?;
        }
    }

    Ok(())
}
