//! roomsort CLI - categorize hotel and apartment photos with a multimodal LLM.
//!
//! Every image in a directory is sent to Gemini with a fixed instruction and a
//! response schema, and is assigned one label from a closed room taxonomy.
//!
//! # Usage
//!
//! ```bash
//! # Categorize the configured input directory (apartment taxonomy)
//! roomsort categorize
//!
//! # Categorize hotel photos and save the results
//! roomsort categorize ./photos/ --property hotel --output results.jsonl
//!
//! # List the labels of a taxonomy
//! roomsort categories --property hotel
//!
//! # View configuration
//! roomsort config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// roomsort - categorize property photos into a fixed room taxonomy.
#[derive(Parser, Debug)]
#[command(name = "roomsort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Categorize an image or every image in a directory
    Categorize(cli::categorize::CategorizeArgs),

    /// List the categories of a property taxonomy
    Categories(cli::categories::CategoriesArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match roomsort_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `roomsort config path`."
            );
            roomsort_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("roomsort v{}", roomsort_core::VERSION);

    match cli.command {
        Commands::Categorize(args) => cli::categorize::execute(args, config).await,
        Commands::Categories(args) => cli::categories::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
