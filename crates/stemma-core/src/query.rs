//! # Query Layer
//!
//! Read-only traversal and filtering over the identity tables.
//!
//! Two naming conventions of this engine are load-bearing and kept exactly:
//!
//! - "incident" edges are **in-edges only** (edges ending at a node), not
//!   the generic graph-theory sense of all touching edges.
//! - a "root" is a node with zero edges in **either** direction, i.e. a
//!   fully isolated node — not a node without parents.
//!
//! Node name lookup is exact-match while edge name lookup is suffix-match;
//! both behaviors are part of the observable contract.

use crate::{EdgeId, FeatureMap, Graph, NodeId, StemmaError, primitives::ENDPOINT_ARITY};
use std::collections::{BTreeMap, BTreeSet};

impl Graph {
    // =========================================================================
    // NAME LOOKUPS
    // =========================================================================

    /// All live nodes whose name equals `name` exactly.
    #[must_use]
    pub fn nodes_by_name(&self, name: &str) -> BTreeSet<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, record)| record.name == name)
            .map(|(&id, _)| id)
            .collect()
    }

    /// All live edges whose name **ends with** `name`.
    ///
    /// Suffix semantics: an edge named `"nsubj"` is found when querying
    /// `"subj"`. This deliberately differs from the exact-match node
    /// lookup.
    #[must_use]
    pub fn edges_by_name(&self, name: &str) -> BTreeSet<EdgeId> {
        self.edges
            .iter()
            .filter(|(_, record)| record.name.ends_with(name))
            .map(|(&id, _)| id)
            .collect()
    }

    /// The display name of a live node.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|record| record.name.as_str())
    }

    /// The display name of a live edge.
    #[must_use]
    pub fn edge_name(&self, id: EdgeId) -> Option<&str> {
        self.edges.get(&id).map(|record| record.name.as_str())
    }

    /// Snapshot of the full live node id -> name mapping.
    #[must_use]
    pub fn node_names(&self) -> BTreeMap<NodeId, String> {
        self.nodes
            .iter()
            .map(|(&id, record)| (id, record.name.clone()))
            .collect()
    }

    /// Snapshot of the full live edge id -> name mapping.
    #[must_use]
    pub fn edge_names(&self) -> BTreeMap<EdgeId, String> {
        self.edges
            .iter()
            .map(|(&id, record)| (id, record.name.clone()))
            .collect()
    }

    // =========================================================================
    // ADJACENCY
    // =========================================================================

    /// Target endpoints of all outgoing edges of `id`.
    ///
    /// Empty if `id` is not live.
    #[must_use]
    pub fn children(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|&edge| self.connection(edge))
            .map(|(_, target)| target)
            .collect()
    }

    /// Source endpoints of all edges terminating at `id`.
    ///
    /// Empty if `id` is not live.
    #[must_use]
    pub fn parents(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.incoming
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|&edge| self.connection(edge))
            .map(|(source, _)| source)
            .collect()
    }

    /// Number of distinct child nodes, or `None` if `id` is not live.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> Option<usize> {
        if !self.contains_node(id) {
            return None;
        }
        Some(self.children(id).len())
    }

    /// Number of distinct parent nodes, or `None` if `id` is not live.
    #[must_use]
    pub fn parent_count(&self, id: NodeId) -> Option<usize> {
        if !self.contains_node(id) {
            return None;
        }
        Some(self.parents(id).len())
    }

    /// In-edges of `id` as an edge id -> (source, target) mapping.
    ///
    /// "Incident" here means edges **terminating at** `id`, per this
    /// engine's convention. Empty if `id` is not live.
    #[must_use]
    pub fn incident_edges(&self, id: NodeId) -> BTreeMap<EdgeId, (NodeId, NodeId)> {
        self.incoming
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|&edge| self.connection(edge).map(|pair| (edge, pair)))
            .collect()
    }

    /// Out-edges of `id` as an edge id -> (source, target) mapping.
    ///
    /// Empty if `id` is not live.
    #[must_use]
    pub fn outgoing_edges(&self, id: NodeId) -> BTreeMap<EdgeId, (NodeId, NodeId)> {
        self.outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|&edge| self.connection(edge).map(|pair| (edge, pair)))
            .collect()
    }

    /// All fully isolated nodes: zero edges touching them in either
    /// direction.
    ///
    /// A node with children but no parent is **not** a root by this
    /// definition. The tree rendering builds on this, so such nodes are
    /// absent from it as well.
    #[must_use]
    pub fn roots(&self) -> BTreeSet<NodeId> {
        self.nodes
            .keys()
            .filter(|id| !self.outgoing.contains_key(id) && !self.incoming.contains_key(id))
            .copied()
            .collect()
    }

    /// The full edge id -> (source, target) map over the entire graph.
    ///
    /// # Errors
    ///
    /// Fails with [`StemmaError::Hyperedge`] if any edge record holds other
    /// than exactly two endpoints. The engine never constructs such an
    /// edge, so this is an invariant violation, not a recoverable input
    /// condition; any future extension must preserve the check.
    pub fn all_edge_connections(&self) -> Result<BTreeMap<EdgeId, (NodeId, NodeId)>, StemmaError> {
        let mut connections = BTreeMap::new();
        for (&id, record) in &self.edges {
            if record.endpoints.len() != ENDPOINT_ARITY {
                return Err(StemmaError::Hyperedge {
                    edge: id,
                    arity: record.endpoints.len(),
                });
            }
            if let [source, target] = record.endpoints.as_slice() {
                connections.insert(id, (*source, *target));
            }
        }
        Ok(connections)
    }

    // =========================================================================
    // FEATURES & FILTERS
    // =========================================================================

    /// Snapshot of a node's feature map; empty if `id` is not live.
    #[must_use]
    pub fn node_features(&self, id: NodeId) -> FeatureMap {
        self.nodes
            .get(&id)
            .map(|record| record.features.clone())
            .unwrap_or_default()
    }

    /// Snapshot of an edge's feature map; empty if `id` is not live.
    #[must_use]
    pub fn edge_features(&self, id: EdgeId) -> FeatureMap {
        self.edges
            .get(&id)
            .map(|record| record.features.clone())
            .unwrap_or_default()
    }

    /// All edges satisfying every supplied filter.
    ///
    /// The non-destructive twin of [`Graph::remove_edges_matching`]: same
    /// AND-of-supplied-filters semantics, missing filters are wildcards,
    /// the name filter is exact equality and blank counts as absent. With
    /// no filter supplied the result is empty.
    #[must_use]
    pub fn edges_matching(
        &self,
        source: Option<NodeId>,
        target: Option<NodeId>,
        name: Option<&str>,
    ) -> BTreeSet<EdgeId> {
        let name = name.filter(|n| !n.trim().is_empty());
        if source.is_none() && target.is_none() && name.is_none() {
            return BTreeSet::new();
        }
        self.edges
            .keys()
            .copied()
            .filter(|&id| self.edge_matches(id, source, target, name))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureValue;

    /// the -det-> cat <-nsubj- sat, plus an isolated punctuation node.
    fn sample() -> (Graph, NodeId, NodeId, NodeId, NodeId) {
        let mut graph = Graph::new();
        let the = graph.add_node("the").expect("add");
        let cat = graph.add_node("cat").expect("add");
        let sat = graph.add_node("sat").expect("add");
        let dot = graph.add_node(".").expect("add");
        graph.add_edge(the, cat, "det").expect("edge");
        graph.add_edge(sat, cat, "nsubj").expect("edge");
        (graph, the, cat, sat, dot)
    }

    #[test]
    fn node_lookup_is_exact() {
        let (graph, the, ..) = sample();
        assert_eq!(graph.nodes_by_name("the"), BTreeSet::from([the]));
        assert!(graph.nodes_by_name("he").is_empty());
    }

    #[test]
    fn edge_lookup_is_suffix() {
        let (graph, ..) = sample();
        // "nsubj" ends with "subj"; "det" does not.
        assert_eq!(graph.edges_by_name("subj").len(), 1);
        assert_eq!(graph.edges_by_name("nsubj").len(), 1);
        assert!(graph.edges_by_name("nsubjpass").is_empty());
    }

    #[test]
    fn children_and_parents_follow_direction() {
        let (graph, the, cat, sat, _) = sample();
        assert_eq!(graph.children(the), BTreeSet::from([cat]));
        assert_eq!(graph.parents(cat), BTreeSet::from([the, sat]));
        assert!(graph.children(cat).is_empty());
        assert_eq!(graph.child_count(sat), Some(1));
        assert_eq!(graph.parent_count(the), Some(0));
        assert_eq!(graph.child_count(NodeId(99)), None);
    }

    #[test]
    fn incident_means_in_edges_only() {
        let (graph, the, cat, sat, _) = sample();
        let incident = graph.incident_edges(cat);
        assert_eq!(incident.len(), 2);
        for (source, target) in incident.values() {
            assert_eq!(*target, cat);
            assert!(*source == the || *source == sat);
        }
        // `the` only has an out-edge, so nothing is incident to it.
        assert!(graph.incident_edges(the).is_empty());
        assert_eq!(graph.outgoing_edges(the).len(), 1);
    }

    #[test]
    fn roots_are_isolated_nodes() {
        let (graph, _, _, _, dot) = sample();
        // `sat` has an outgoing edge, so despite having no parent it is
        // not a root under the isolated-node definition.
        assert_eq!(graph.roots(), BTreeSet::from([dot]));
    }

    #[test]
    fn queries_on_dead_ids_are_empty() {
        let (mut graph, the, ..) = sample();
        graph.remove_node(the);
        assert!(graph.children(the).is_empty());
        assert!(graph.outgoing_edges(the).is_empty());
        assert_eq!(graph.node_name(the), None);
        assert!(graph.node_features(the).is_empty());
    }

    #[test]
    fn name_snapshots_cover_live_entities() {
        let (mut graph, the, cat, ..) = sample();
        graph.remove_node(the);
        let names = graph.node_names();
        assert_eq!(names.len(), 3);
        assert_eq!(names.get(&cat).map(String::as_str), Some("cat"));
        assert!(!names.contains_key(&the));
        assert_eq!(graph.edge_names().len(), 1);
    }

    #[test]
    fn edges_matching_filters_combine() {
        let (graph, the, cat, sat, _) = sample();
        assert_eq!(graph.edges_matching(Some(the), Some(cat), None).len(), 1);
        assert_eq!(graph.edges_matching(None, Some(cat), None).len(), 2);
        assert!(
            graph
                .edges_matching(Some(sat), Some(cat), Some("det"))
                .is_empty()
        );
        // No filters at all: empty, never "everything".
        assert!(graph.edges_matching(None, None, None).is_empty());
    }

    #[test]
    fn all_edge_connections_lists_every_pair() {
        let (graph, the, cat, sat, _) = sample();
        let connections = graph.all_edge_connections().expect("connections");
        assert_eq!(connections.len(), 2);
        assert!(connections.values().any(|&pair| pair == (the, cat)));
        assert!(connections.values().any(|&pair| pair == (sat, cat)));
    }

    #[test]
    fn all_edge_connections_rejects_hyperedge() {
        let (mut graph, the, cat, sat, _) = sample();
        // Plant a malformed record the public API cannot create.
        let edge = graph.add_edge(the, cat, "mal").expect("edge");
        if let Some(record) = graph.edges.get_mut(&edge) {
            record.endpoints.push(sat);
        }
        let err = graph.all_edge_connections();
        assert!(matches!(
            err,
            Err(StemmaError::Hyperedge { edge: e, arity: 3 }) if e == edge
        ));
    }

    #[test]
    fn feature_snapshot_is_detached() {
        let (mut graph, the, ..) = sample();
        graph.set_node_feature(the, "pos", FeatureValue::from("DT"));
        let snapshot = graph.node_features(the);
        graph.set_node_feature(the, "pos", FeatureValue::from("NN"));
        assert_eq!(snapshot.get("pos").and_then(|v| v.as_str()), Some("DT"));
    }
}
