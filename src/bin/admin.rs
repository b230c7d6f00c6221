//! CLI administration tool for shortly.
//!
//! Requests short links from a running server and inspects the record store
//! directly.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL through a running server
//! cargo run --bin admin -- shorten https://example.com --custom-code promo1
//!
//! # Inspect a record
//! cargo run --bin admin -- info promo1
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection and schema
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: SQLite connection string (default: `sqlite://shortly.db`)
//! - `SHORTEN_ENDPOINT`: endpoint used by `shorten`

use shortly::client::ShortenClient;
use shortly::config::{self, Config, StorageBackend};
use shortly::domain::repositories::UrlRepository;
use shortly::server::open_store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;

/// CLI tool for managing shortly.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL through a running server
    Shorten {
        /// The URL to shorten
        url: String,

        /// Custom short code (4-16 alphanumeric characters)
        #[arg(short, long)]
        custom_code: Option<String>,

        /// Shortening endpoint of the server
        #[arg(
            short,
            long,
            env = "SHORTEN_ENDPOINT",
            default_value = "http://127.0.0.1:8000/shorten"
        )]
        endpoint: String,
    },

    /// Show the stored record for a code
    Info {
        /// Short code to look up
        code: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and apply migrations
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Shorten {
            url,
            custom_code,
            endpoint,
        } => shorten(url, custom_code, endpoint).await?,
        Commands::Info { code } => {
            let repo = connect().await?;
            show_info(repo, &code).await?;
        }
        Commands::Stats => {
            let repo = connect().await?;
            show_stats(repo).await?;
        }
        Commands::Db {
            action: DbAction::Check,
        } => db_check().await?,
    }

    Ok(())
}

/// Loads configuration the same way the server does.
fn load_config() -> Result<Config> {
    let config = config::load_from_env().context("Invalid configuration")?;

    if config.storage_backend == StorageBackend::Memory {
        anyhow::bail!("STORAGE_BACKEND=memory has no persistent store to inspect");
    }

    Ok(config)
}

async fn connect() -> Result<Arc<dyn UrlRepository>> {
    let config = load_config()?;
    open_store(&config).await
}

/// Requests a short link from the server at `endpoint`.
async fn shorten(url: String, custom_code: Option<String>, endpoint: String) -> Result<()> {
    println!("{}", "Shorten URL".bright_blue().bold());
    println!();
    println!("  Endpoint: {}", endpoint.bright_black());
    println!("  Target:   {}", url.cyan());
    if let Some(ref code) = custom_code {
        println!("  Code:     {}", code.cyan());
    }
    println!();

    let client = ShortenClient::new(endpoint);

    match client.shorten(&url, custom_code.as_deref()).await {
        Ok(short_url) => {
            println!("{}", "Short link created".green().bold());
            println!("  {}", short_url.bright_yellow().bold());
            println!();
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Failed:".red().bold(), e);
            Err(e.into())
        }
    }
}

/// Prints one record.
///
/// # Output Format
///
/// ```text
/// Link promo1
///
///   Target:  https://example.com
///   Clicks:  42
///   Created: 2025-01-15 10:30
/// ```
async fn show_info(repo: Arc<dyn UrlRepository>, code: &str) -> Result<()> {
    let record = repo
        .get(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read record: {}", e))?;

    let Some(record) = record else {
        println!("{} {}", "No link with code".yellow(), code.cyan());
        return Ok(());
    };

    println!("{} {}", "Link".bright_blue().bold(), record.code.cyan().bold());
    println!();
    println!("  Target:  {}", record.target.bright_white());
    println!(
        "  Clicks:  {}",
        record.clicks.to_string().bright_green().bold()
    );
    println!(
        "  Created: {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();

    Ok(())
}

/// Displays link and click totals.
async fn show_stats(repo: Arc<dyn UrlRepository>) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let stats = repo
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read statistics: {}", e))?;

    println!(
        "  Links:  {}",
        stats.links.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        stats.clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Connects, migrates and reports totals.
async fn db_check() -> Result<()> {
    println!("{}", "Checking database connection...".bright_blue());

    let config = load_config()?;
    let repo = open_store(&config).await?;

    println!("{}", "Database connection OK".green().bold());
    println!("  Database: {}", config.database_url.bright_white());

    let stats = repo
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    println!(
        "  Schema up to date, {} links stored",
        stats.links.to_string().bright_white()
    );
    println!();

    Ok(())
}
