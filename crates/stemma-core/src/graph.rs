//! # Graph Engine — Identity & Mutation Layer
//!
//! The owning container for one graph's nodes and edges, and every
//! operation that mutates it.
//!
//! Storage is composition over an arena+index model: a node table and an
//! edge table of records `{name, features}` keyed by stable integer
//! handles, plus an adjacency index (out-edge set and in-edge set per node)
//! maintained directly by the mutation operations. All tables use
//! `BTreeMap`/`BTreeSet` for deterministic ordering.
//!
//! Invalid input (blank names, unknown endpoints, duplicate explicit ids,
//! operating on a removed id) is signalled by a `None`/`false`/`0` return,
//! never an error. Every mutation either fully succeeds or has no effect.

use crate::primitives::FIRST_ID;
use crate::{EdgeId, FeatureMap, FeatureValue, NodeId};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// RECORDS
// =============================================================================

/// Stored state of one live node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeRecord {
    /// Non-blank display name, mutable after creation.
    pub(crate) name: String,
    /// Typed metadata attached by the producing stage.
    pub(crate) features: FeatureMap,
}

/// Stored state of one live edge.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EdgeRecord {
    /// Non-blank display name, mutable after creation.
    pub(crate) name: String,
    /// Ordered endpoints, fixed at creation. The engine only ever records
    /// the pair (source, target); the connection-map query defends this
    /// arity and hard-fails if an extension ever widens it.
    pub(crate) endpoints: Vec<NodeId>,
    /// Typed metadata attached by the producing stage.
    pub(crate) features: FeatureMap,
}

// =============================================================================
// GRAPH
// =============================================================================

/// A named, attributed directed multigraph.
///
/// One instance holds one logical unit of analysis (a sentence's dependency
/// graph, a document's outline tree, a relation set) and is owned by a
/// single producer. Multiple edges between the same ordered node pair are
/// permitted. Node and edge ids are never reused for the lifetime of the
/// instance.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Node table: NodeId -> record.
    pub(crate) nodes: BTreeMap<NodeId, NodeRecord>,

    /// Edge table: EdgeId -> record.
    pub(crate) edges: BTreeMap<EdgeId, EdgeRecord>,

    /// Out-edge index: source node -> edges leaving it.
    pub(crate) outgoing: BTreeMap<NodeId, BTreeSet<EdgeId>>,

    /// In-edge index: target node -> edges ending at it.
    pub(crate) incoming: BTreeMap<NodeId, BTreeSet<EdgeId>>,

    /// Next system-chosen node id.
    next_node_id: u64,

    /// Next system-chosen edge id.
    next_edge_id: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            outgoing: BTreeMap::new(),
            incoming: BTreeMap::new(),
            next_node_id: FIRST_ID,
            next_edge_id: FIRST_ID,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether `id` identifies a live node.
    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Whether `id` identifies a live edge.
    #[must_use]
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// The next node id a system-chosen allocation would assign.
    #[must_use]
    pub fn next_node_id(&self) -> u64 {
        self.next_node_id
    }

    /// The next edge id a system-chosen allocation would assign.
    #[must_use]
    pub fn next_edge_id(&self) -> u64 {
        self.next_edge_id
    }

    // =========================================================================
    // NODE MUTATION
    // =========================================================================

    /// Add a node with the next system-chosen id.
    ///
    /// Returns the assigned id, or `None` if `name` is blank (in which case
    /// no id is consumed).
    pub fn add_node(&mut self, name: &str) -> Option<NodeId> {
        if name.trim().is_empty() {
            return None;
        }
        let id = NodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        self.insert_node_record(id, name);
        Some(id)
    }

    /// Add a node under a caller-supplied id.
    ///
    /// Used to mirror ids minted by another component (e.g. external token
    /// ids). Fails if `name` is blank or `id` is already live. On success
    /// the system counter advances past `id` so later system-chosen ids
    /// cannot collide.
    pub fn add_node_with_id(&mut self, id: NodeId, name: &str) -> Option<NodeId> {
        if name.trim().is_empty() || self.nodes.contains_key(&id) {
            return None;
        }
        if id.0 >= self.next_node_id {
            self.next_node_id = id.0.saturating_add(1);
        }
        self.insert_node_record(id, name);
        Some(id)
    }

    fn insert_node_record(&mut self, id: NodeId, name: &str) {
        self.nodes.insert(
            id,
            NodeRecord {
                name: name.to_string(),
                features: FeatureMap::new(),
            },
        );
    }

    /// Change a node's display name.
    ///
    /// `false` (and no effect) if `id` is not live or `name` is blank.
    pub fn rename_node(&mut self, id: NodeId, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        match self.nodes.get_mut(&id) {
            Some(record) => {
                record.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a node and every edge touching it.
    ///
    /// Cascades first: each edge for which `id` is source or target is
    /// removed (record and index entries purged), then the node itself.
    /// No dangling edge ever references a removed node. `false` if `id`
    /// is not live.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }

        // A self-loop appears in both indexes; the set keeps it to one removal.
        let mut touching: BTreeSet<EdgeId> = BTreeSet::new();
        if let Some(out) = self.outgoing.get(&id) {
            touching.extend(out.iter().copied());
        }
        if let Some(inc) = self.incoming.get(&id) {
            touching.extend(inc.iter().copied());
        }
        for edge in touching {
            self.remove_edge(edge);
        }

        self.outgoing.remove(&id);
        self.incoming.remove(&id);
        self.nodes.remove(&id);
        true
    }

    /// Set or overwrite a feature on a node (last-write-wins).
    ///
    /// `false` if `id` is not live or `key` is blank.
    pub fn set_node_feature(&mut self, id: NodeId, key: &str, value: FeatureValue) -> bool {
        if key.trim().is_empty() {
            return false;
        }
        match self.nodes.get_mut(&id) {
            Some(record) => {
                record.features.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // EDGE MUTATION
    // =========================================================================

    /// Add a directed edge with the next system-chosen id.
    ///
    /// Fails if `name` is blank or either endpoint is not live; no id is
    /// consumed on failure. The (source, target) pair is fixed for the
    /// edge's lifetime.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, name: &str) -> Option<EdgeId> {
        if name.trim().is_empty()
            || !self.nodes.contains_key(&source)
            || !self.nodes.contains_key(&target)
        {
            return None;
        }
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id = self.next_edge_id.saturating_add(1);
        self.insert_edge_record(id, source, target, name);
        Some(id)
    }

    /// Add a directed edge under a caller-supplied id.
    ///
    /// Same contract as [`Graph::add_edge`], and additionally fails if `id`
    /// is already live. On success the system counter advances past `id`.
    pub fn add_edge_with_id(
        &mut self,
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        name: &str,
    ) -> Option<EdgeId> {
        if name.trim().is_empty()
            || self.edges.contains_key(&id)
            || !self.nodes.contains_key(&source)
            || !self.nodes.contains_key(&target)
        {
            return None;
        }
        if id.0 >= self.next_edge_id {
            self.next_edge_id = id.0.saturating_add(1);
        }
        self.insert_edge_record(id, source, target, name);
        Some(id)
    }

    fn insert_edge_record(&mut self, id: EdgeId, source: NodeId, target: NodeId, name: &str) {
        self.edges.insert(
            id,
            EdgeRecord {
                name: name.to_string(),
                endpoints: vec![source, target],
                features: FeatureMap::new(),
            },
        );
        self.outgoing.entry(source).or_default().insert(id);
        self.incoming.entry(target).or_default().insert(id);
    }

    /// Change an edge's display name.
    ///
    /// `false` (and no effect) if `id` is not live or `name` is blank.
    pub fn rename_edge(&mut self, id: EdgeId, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        match self.edges.get_mut(&id) {
            Some(record) => {
                record.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove an edge, purging its record and index entries.
    ///
    /// `false` if `id` is not live.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let Some(record) = self.edges.remove(&id) else {
            return false;
        };
        if let [source, target] = record.endpoints.as_slice() {
            Self::detach(&mut self.outgoing, *source, id);
            Self::detach(&mut self.incoming, *target, id);
        }
        true
    }

    /// Drop `edge` from `index[node]`, dropping the entry once empty.
    fn detach(index: &mut BTreeMap<NodeId, BTreeSet<EdgeId>>, node: NodeId, edge: EdgeId) {
        if let Some(set) = index.get_mut(&node) {
            set.remove(&edge);
            if set.is_empty() {
                index.remove(&node);
            }
        }
    }

    /// Set or overwrite a feature on an edge (last-write-wins).
    ///
    /// `false` if `id` is not live or `key` is blank.
    pub fn set_edge_feature(&mut self, id: EdgeId, key: &str, value: FeatureValue) -> bool {
        if key.trim().is_empty() {
            return false;
        }
        match self.edges.get_mut(&id) {
            Some(record) => {
                record.features.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Remove every edge matching all supplied filters.
    ///
    /// Missing filters are wildcards; the supplied ones combine with
    /// logical AND. The name filter is exact equality, and a blank name
    /// counts as absent. Returns the number of edges removed. With no
    /// filter supplied at all this removes nothing — it is never
    /// "remove everything".
    pub fn remove_edges_matching(
        &mut self,
        source: Option<NodeId>,
        target: Option<NodeId>,
        name: Option<&str>,
    ) -> usize {
        let name = name.filter(|n| !n.trim().is_empty());
        if source.is_none() && target.is_none() && name.is_none() {
            return 0;
        }
        let matching: Vec<EdgeId> = self
            .edges
            .keys()
            .copied()
            .filter(|&id| self.edge_matches(id, source, target, name))
            .collect();
        let count = matching.len();
        for id in matching {
            self.remove_edge(id);
        }
        count
    }

    // =========================================================================
    // SHARED HELPERS
    // =========================================================================

    /// The (source, target) pair of a live, well-formed edge.
    pub(crate) fn connection(&self, id: EdgeId) -> Option<(NodeId, NodeId)> {
        match self.edges.get(&id)?.endpoints.as_slice() {
            [source, target] => Some((*source, *target)),
            _ => None,
        }
    }

    /// Whether a live edge satisfies every supplied filter.
    pub(crate) fn edge_matches(
        &self,
        id: EdgeId,
        source: Option<NodeId>,
        target: Option<NodeId>,
        name: Option<&str>,
    ) -> bool {
        let Some(record) = self.edges.get(&id) else {
            return false;
        };
        let Some((edge_source, edge_target)) = self.connection(id) else {
            return false;
        };
        source.is_none_or(|s| s == edge_source)
            && target.is_none_or(|t| t == edge_target)
            && name.is_none_or(|n| n == record.name)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_node_assigns_sequential_ids() {
        let mut graph = Graph::new();
        assert_eq!(graph.add_node("det"), Some(NodeId(1)));
        assert_eq!(graph.add_node("amod"), Some(NodeId(2)));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn blank_node_name_consumes_no_id() {
        let mut graph = Graph::new();
        assert_eq!(graph.add_node(""), None);
        assert_eq!(graph.add_node("   "), None);
        // Next valid creation still gets the first id.
        assert_eq!(graph.add_node("token"), Some(NodeId(1)));
    }

    #[test]
    fn explicit_node_id_collision_rejected() {
        let mut graph = Graph::new();
        assert_eq!(graph.add_node_with_id(NodeId(5), "X"), Some(NodeId(5)));
        assert_eq!(graph.add_node_with_id(NodeId(5), "Y"), None);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn explicit_node_id_advances_counter() {
        let mut graph = Graph::new();
        graph.add_node_with_id(NodeId(10), "external");
        // System-chosen ids continue past the explicit one.
        assert_eq!(graph.add_node("next"), Some(NodeId(11)));
    }

    #[test]
    fn rename_node_requires_live_id_and_name() {
        let mut graph = Graph::new();
        let id = graph.add_node("old").expect("add");
        assert!(graph.rename_node(id, "new"));
        assert!(!graph.rename_node(id, ""));
        assert!(!graph.rename_node(NodeId(99), "name"));
    }

    #[test]
    fn add_edge_requires_live_endpoints() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        assert_eq!(graph.add_edge(a, NodeId(99), "rel"), None);
        assert_eq!(graph.add_edge(NodeId(99), a, "rel"), None);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn add_edge_rejects_blank_name() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        let b = graph.add_node("b").expect("add");
        assert_eq!(graph.add_edge(a, b, " "), None);
        assert_eq!(graph.add_edge(a, b, "nsubj"), Some(EdgeId(1)));
    }

    #[test]
    fn parallel_edges_permitted() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        let b = graph.add_node("b").expect("add");
        let first = graph.add_edge(a, b, "coref").expect("edge");
        let second = graph.add_edge(a, b, "coref").expect("edge");
        assert_ne!(first, second);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge(first));
        assert!(graph.remove_edge(first));
        assert!(!graph.contains_edge(first));
    }

    #[test]
    fn explicit_edge_id_collision_rejected() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        let b = graph.add_node("b").expect("add");
        assert_eq!(
            graph.add_edge_with_id(EdgeId(40), a, b, "rel"),
            Some(EdgeId(40))
        );
        assert_eq!(graph.add_edge_with_id(EdgeId(40), b, a, "rel"), None);
        assert_eq!(graph.add_edge(a, b, "rel"), Some(EdgeId(41)));
    }

    #[test]
    fn remove_node_cascades_to_edges() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        let b = graph.add_node("b").expect("add");
        let c = graph.add_node("c").expect("add");
        graph.add_edge(a, b, "out").expect("edge");
        graph.add_edge(c, a, "in").expect("edge");
        graph.add_edge(b, c, "unrelated").expect("edge");

        assert!(graph.remove_node(a));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(!graph.remove_node(a));
    }

    #[test]
    fn remove_node_handles_self_loop() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        graph.add_edge(a, a, "loop").expect("edge");

        assert!(graph.remove_node(a));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn removed_ids_are_not_recycled() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        graph.remove_node(a);
        let next = graph.add_node("b").expect("add");
        assert_ne!(next, a);
    }

    #[test]
    fn feature_writes_validate_key_and_id() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        assert!(graph.set_node_feature(a, "pos", FeatureValue::from("NN")));
        assert!(!graph.set_node_feature(a, "", FeatureValue::from(1i64)));
        assert!(!graph.set_node_feature(NodeId(9), "pos", FeatureValue::from("NN")));

        // Last write wins.
        assert!(graph.set_node_feature(a, "pos", FeatureValue::from("VB")));
        assert_eq!(
            graph.node_features(a).get("pos").and_then(|v| v.as_str()),
            Some("VB")
        );
    }

    #[test]
    fn remove_edges_matching_is_and_of_filters() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        let b = graph.add_node("b").expect("add");
        let c = graph.add_node("c").expect("add");
        graph.add_edge(a, b, "rel").expect("edge");
        graph.add_edge(a, c, "rel").expect("edge");
        graph.add_edge(a, b, "other").expect("edge");

        let removed = graph.remove_edges_matching(Some(a), Some(b), Some("rel"));
        assert_eq!(removed, 1);
        assert_eq!(graph.edge_count(), 2);

        let removed = graph.remove_edges_matching(Some(a), None, None);
        assert_eq!(removed, 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn remove_edges_matching_without_filters_is_noop() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        let b = graph.add_node("b").expect("add");
        graph.add_edge(a, b, "rel").expect("edge");

        assert_eq!(graph.remove_edges_matching(None, None, None), 0);
        // A blank name filter counts as absent.
        assert_eq!(graph.remove_edges_matching(None, None, Some("  ")), 0);
        assert_eq!(graph.edge_count(), 1);
    }
}
