//! # Export Module
//!
//! Flattens a graph into the row shape downstream exporters consume, and
//! defines the JSON-facing graph document used by the debugging tooling.
//!
//! The document is an interchange format, not a persistence layer: building
//! a graph from one replays every entry through the mutation API, so the
//! usual validation applies and rejected entries are counted, never
//! partially applied.

use crate::{EdgeId, FeatureMap, Graph, NodeId, StemmaError};
use serde::{Deserialize, Serialize};

// =============================================================================
// FLATTENED EDGE ROWS
// =============================================================================

/// One edge flattened to the tuple shape used by report/export code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    /// Edge id.
    pub edge: u64,
    /// Source node id.
    pub source: u64,
    /// Source node display name.
    pub source_name: String,
    /// Target node id.
    pub target: u64,
    /// Target node display name.
    pub target_name: String,
    /// Edge display name (the relation label).
    pub name: String,
}

/// Flatten every live edge into a row, in edge id order.
///
/// # Errors
///
/// Propagates the hyperedge invariant check of
/// [`Graph::all_edge_connections`].
pub fn edge_rows(graph: &Graph) -> Result<Vec<EdgeRow>, StemmaError> {
    let connections = graph.all_edge_connections()?;
    Ok(connections
        .into_iter()
        .map(|(edge, (source, target))| EdgeRow {
            edge: edge.value(),
            source: source.value(),
            source_name: graph.node_name(source).unwrap_or("?").to_string(),
            target: target.value(),
            target_name: graph.node_name(target).unwrap_or("?").to_string(),
            name: graph.edge_name(edge).unwrap_or("?").to_string(),
        })
        .collect())
}

// =============================================================================
// GRAPH DOCUMENT
// =============================================================================

/// A node entry in a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    /// Explicit node id; omitted for system-chosen allocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Display name.
    pub name: String,
    /// Typed metadata.
    #[serde(default, skip_serializing_if = "FeatureMap::is_empty")]
    pub features: FeatureMap,
}

/// An edge entry in a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDoc {
    /// Explicit edge id; omitted for system-chosen allocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Source node id.
    pub source: u64,
    /// Target node id.
    pub target: u64,
    /// Display name (the relation label).
    pub name: String,
    /// Typed metadata.
    #[serde(default, skip_serializing_if = "FeatureMap::is_empty")]
    pub features: FeatureMap,
}

/// Entries skipped while building a graph from a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Node entries rejected (blank name, duplicate explicit id).
    pub nodes_rejected: usize,
    /// Edge entries rejected (blank name, unknown endpoint, duplicate id).
    pub edges_rejected: usize,
    /// Feature entries rejected (blank key).
    pub features_rejected: usize,
}

impl ImportReport {
    /// Whether every entry of the document was applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.nodes_rejected == 0 && self.edges_rejected == 0 && self.features_rejected == 0
    }
}

/// A whole graph as a serde-facing document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDoc {
    /// Node entries; ids are always explicit when exported.
    #[serde(default)]
    pub nodes: Vec<NodeDoc>,
    /// Edge entries; ids are always explicit when exported.
    #[serde(default)]
    pub edges: Vec<EdgeDoc>,
}

impl GraphDoc {
    /// Snapshot a graph into a document, nodes and edges in id order.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .node_names()
            .into_iter()
            .map(|(id, name)| NodeDoc {
                id: Some(id.value()),
                name,
                features: graph.node_features(id),
            })
            .collect();
        let edges = graph
            .edge_names()
            .into_iter()
            .filter_map(|(id, name)| {
                let (source, target) = graph.connection(id)?;
                Some(EdgeDoc {
                    id: Some(id.value()),
                    source: source.value(),
                    target: target.value(),
                    name,
                    features: graph.edge_features(id),
                })
            })
            .collect();
        Self { nodes, edges }
    }

    /// Build a graph by replaying the document through the mutation API.
    ///
    /// Node entries are applied first, then edges. Entries the mutation
    /// layer rejects are skipped and counted in the report; nothing is
    /// partially applied.
    #[must_use]
    pub fn build_graph(&self) -> (Graph, ImportReport) {
        let mut graph = Graph::new();
        let mut report = ImportReport::default();

        for node in &self.nodes {
            let assigned = match node.id {
                Some(id) => graph.add_node_with_id(NodeId(id), &node.name),
                None => graph.add_node(&node.name),
            };
            match assigned {
                Some(id) => {
                    for (key, value) in &node.features {
                        if !graph.set_node_feature(id, key, value.clone()) {
                            report.features_rejected += 1;
                        }
                    }
                }
                None => report.nodes_rejected += 1,
            }
        }

        for edge in &self.edges {
            let source = NodeId(edge.source);
            let target = NodeId(edge.target);
            let assigned = match edge.id {
                Some(id) => graph.add_edge_with_id(EdgeId(id), source, target, &edge.name),
                None => graph.add_edge(source, target, &edge.name),
            };
            match assigned {
                Some(id) => {
                    for (key, value) in &edge.features {
                        if !graph.set_edge_feature(id, key, value.clone()) {
                            report.features_rejected += 1;
                        }
                    }
                }
                None => report.edges_rejected += 1,
            }
        }

        (graph, report)
    }
}

// =============================================================================
// TESTS
// =============================================================================
