//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::{Rendering, RowFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};
use stemma_core::{EdgeRow, Graph, GraphDoc, RenderMode, StemmaError, edge_rows};

// =============================================================================
// FILE HANDLING
// =============================================================================

/// Maximum file size for graph documents (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_DOCUMENT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), StemmaError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| StemmaError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(StemmaError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path to resolve symlinks and "..", ensures it exists
/// and is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, StemmaError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| StemmaError::Io(format!("Invalid file path '{}': {}", path.display(), e)))?;

    if !canonical.is_file() {
        return Err(StemmaError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Load a graph document and build the graph through the mutation API.
///
/// Entries the engine rejects (blank names, unknown endpoints, duplicate
/// explicit ids) are skipped and reported as warnings.
fn load_graph(path: &Path) -> Result<Graph, StemmaError> {
    let canonical = validate_file_path(path)?;
    validate_file_size(&canonical, MAX_DOCUMENT_FILE_SIZE)?;

    let raw = std::fs::read_to_string(&canonical)
        .map_err(|e| StemmaError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    let doc: GraphDoc = serde_json::from_str(&raw)
        .map_err(|e| StemmaError::Serialization(format!("Invalid graph document: {}", e)))?;

    let (graph, report) = doc.build_graph();
    if !report.is_clean() {
        tracing::warn!(
            nodes_rejected = report.nodes_rejected,
            edges_rejected = report.edges_rejected,
            features_rejected = report.features_rejected,
            "document contained entries the engine rejected"
        );
    }
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    Ok(graph)
}

// =============================================================================
// RENDER COMMAND
// =============================================================================

/// Render a graph document as text.
pub fn cmd_render(file: &Path, mode: Rendering) -> Result<(), StemmaError> {
    let graph = load_graph(file)?;
    let mode = match mode {
        Rendering::Nodes => RenderMode::NodeList,
        Rendering::Tree => RenderMode::Tree,
    };
    print!("{}", graph.render(mode));
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Flatten a graph document to edge rows and write them as JSON or CSV.
pub fn cmd_export(
    file: &Path,
    output: Option<&Path>,
    format: RowFormat,
) -> Result<(), StemmaError> {
    let graph = load_graph(file)?;
    let rows = edge_rows(&graph)?;

    let rendered = match format {
        RowFormat::Json => serde_json::to_string_pretty(&rows)
            .map_err(|e| StemmaError::Serialization(e.to_string()))?,
        RowFormat::Csv => rows_to_csv(&rows),
    };

    match output {
        Some(target) => {
            std::fs::write(target, rendered).map_err(|e| {
                StemmaError::Io(format!("Cannot write '{}': {}", target.display(), e))
            })?;
            println!("Exported {} edge rows to {}", rows.len(), target.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Render edge rows as CSV with a header line.
fn rows_to_csv(rows: &[EdgeRow]) -> String {
    let mut out = String::from("edge,source,source_name,target,target_name,name\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            row.edge,
            row.source,
            csv_escape(&row.source_name),
            row.target,
            csv_escape(&row.target_name),
            csv_escape(&row.name)
        ));
    }
    out
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// =============================================================================
// STATS COMMAND
// =============================================================================

/// Counts reported by the stats command.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct GraphStats {
    nodes: usize,
    edges: usize,
    isolated_nodes: usize,
    node_features: usize,
    edge_features: usize,
}

fn collect_stats(graph: &Graph) -> GraphStats {
    let node_features = graph
        .node_names()
        .keys()
        .map(|&id| graph.node_features(id).len())
        .sum();
    let edge_features = graph
        .edge_names()
        .keys()
        .map(|&id| graph.edge_features(id).len())
        .sum();
    GraphStats {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        isolated_nodes: graph.roots().len(),
        node_features,
        edge_features,
    }
}

/// Show graph statistics as text or JSON.
pub fn cmd_stats(file: &Path, json: bool) -> Result<(), StemmaError> {
    let graph = load_graph(file)?;
    let stats = collect_stats(&graph);

    if json {
        let rendered = serde_json::to_string_pretty(&stats)
            .map_err(|e| StemmaError::Serialization(e.to_string()))?;
        println!("{}", rendered);
    } else {
        println!("Nodes:          {}", stats.nodes);
        println!("Edges:          {}", stats.edges);
        println!("Isolated nodes: {}", stats.isolated_nodes);
        println!("Node features:  {}", stats.node_features);
        println!("Edge features:  {}", stats.edge_features);
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
