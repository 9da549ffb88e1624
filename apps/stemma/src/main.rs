//! # Stemma Graph Tooling
//!
//! The debugging and export binary for stemma graph documents.
//!
//! This application provides:
//! - Text renderings of a graph (flat node listing, rooted tree)
//! - Flattened edge-row export (JSON / CSV)
//! - Graph statistics
//!
//! ## Usage
//!
//! ```bash
//! # Render a graph document as a node listing
//! stemma render -f sentence.json --mode nodes
//!
//! # Render the rooted tree view
//! stemma render -f outline.json --mode tree
//!
//! # Flatten edges to CSV rows
//! stemma export -f citations.json --format csv -o citations.csv
//!
//! # Show counts
//! stemma stats -f sentence.json --json
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments first so --verbose can widen the filter.
    let cli = cli::Cli::parse();

    // Initialize tracing — STEMMA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("STEMMA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "stemma=debug"
    } else {
        "stemma=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the stemma startup banner.
fn print_banner() {
    println!("stemma — graph tooling for text-mining structures");
    println!();
}
