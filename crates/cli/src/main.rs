//! Brandview CLI - brand listings in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show products of several brands (one shared fetch)
//! brandview-cli products --brand Apple --brand Samsung
//!
//! # Same, as JSON
//! brandview-cli products --brand Apple --json
//!
//! # List brands in the catalog with product counts
//! brandview-cli brands
//! ```
//!
//! # Commands
//!
//! - `products` - Render brand product lists, offering a retry on failure
//! - `brands` - Summarize the catalog by brand
//!
//! Catalog settings come from `BRANDVIEW_*` environment variables (a `.env`
//! file is honoured).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "brandview-cli")]
#[command(author, version, about = "Brandview CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show products of one or more brands
    Products {
        /// Brand to show (repeatable, exact match)
        #[arg(short, long = "brand", required = true)]
        brands: Vec<String>,

        /// Print JSON instead of text (never prompts)
        #[arg(long)]
        json: bool,
    },
    /// List brands in the catalog with product counts
    Brands,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for --json
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "brandview_cli=info,brandview_catalog=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { brands, json } => {
            commands::products::show(&brands, json).await?;
        }
        Commands::Brands => commands::brands::list().await?,
    }
    Ok(())
}
