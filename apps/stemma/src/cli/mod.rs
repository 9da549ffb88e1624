//! # Stemma CLI Module
//!
//! This module implements the CLI interface for the stemma tooling binary.
//!
//! ## Available Commands
//!
//! - `render` - Render a graph document as text (node listing or tree)
//! - `export` - Flatten a graph document to edge rows (JSON or CSV)
//! - `stats` - Show graph statistics

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use stemma_core::StemmaError;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Stemma graph tooling
///
/// Renders, exports and inspects the graph documents produced by the
/// stemma text-mining pipeline: dependency graphs, outline trees, citation
/// and coreference link sets.
#[derive(Parser, Debug)]
#[command(name = "stemma")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a graph document as text
    Render {
        /// Path to the graph document (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Rendering to produce
        #[arg(short, long, value_enum, default_value = "nodes")]
        mode: Rendering,
    },

    /// Flatten a graph document to edge rows
    Export {
        /// Path to the graph document (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Row format
        #[arg(long, value_enum, default_value = "json")]
        format: RowFormat,
    },

    /// Show graph statistics
    Stats {
        /// Path to the graph document (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Output statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Text rendering selector (maps onto the engine's two modes).
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    /// Flat per-node listing with in- and out-edges
    Nodes,
    /// Depth-first rooted tree
    Tree,
}

/// Edge-row output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    /// JSON array of row objects
    Json,
    /// Comma-separated values with a header line
    Csv,
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Execute the parsed command.
pub fn execute(cli: Cli) -> Result<(), StemmaError> {
    match cli.command {
        Commands::Render { file, mode } => commands::cmd_render(&file, mode),
        Commands::Export {
            file,
            output,
            format,
        } => commands::cmd_export(&file, output.as_deref(), format),
        Commands::Stats { file, json } => commands::cmd_stats(&file, json),
    }
}
