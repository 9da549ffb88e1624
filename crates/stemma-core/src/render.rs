//! # Serialization Layer — Text Renderings
//!
//! Renders a graph to the two human-readable text forms used for debugging
//! and export: a flat per-node listing and a depth-first rooted tree.
//!
//! The tree rendering starts from [`Graph::roots`] — fully isolated nodes,
//! per this engine's definition — and is hard-capped at
//! [`TREE_DEPTH_LIMIT`](crate::primitives::TREE_DEPTH_LIMIT) levels. The
//! cap is the sole cycle-termination guarantee: the graph typically holds
//! trees but is not guaranteed acyclic.

use crate::primitives::TREE_DEPTH_LIMIT;
use crate::{Graph, NodeId};
use std::fmt::Write as _;

/// The two mutually exclusive textual renderings of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Every live node in id order with its in- and out-edges.
    NodeList,
    /// Depth-first rendering of each root and its descendants.
    Tree,
}

impl Graph {
    /// Render the graph as text in the requested mode.
    #[must_use]
    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::NodeList => self.render_node_list(),
            RenderMode::Tree => self.render_tree(),
        }
    }

    /// One line per node: name, id, feature count and key set; then one
    /// line per in-edge (`<-`) and out-edge (`->`) with the edge's name and
    /// id and the far endpoint's name, id and feature count.
    fn render_node_list(&self) -> String {
        let mut out = String::new();
        for &id in self.nodes.keys() {
            let _ = writeln!(out, "{}", self.describe_node(id));
            for (edge, (source, _)) in self.incident_edges(id) {
                let _ = writeln!(
                    out,
                    "  <- \"{}\" (edge {}) from {}",
                    self.edge_name(edge).unwrap_or("?"),
                    edge.value(),
                    self.describe_endpoint(source)
                );
            }
            for (edge, (_, target)) in self.outgoing_edges(id) {
                let _ = writeln!(
                    out,
                    "  -> \"{}\" (edge {}) to {}",
                    self.edge_name(edge).unwrap_or("?"),
                    edge.value(),
                    self.describe_endpoint(target)
                );
            }
        }
        out
    }

    /// One block per root, each child line carrying the edge name and the
    /// child's feature count, indented by depth.
    fn render_tree(&self) -> String {
        let mut out = String::new();
        for root in self.roots() {
            let _ = writeln!(out, "root {}", self.describe_node(root));
            self.render_subtree(root, 1, &mut out);
        }
        out
    }

    fn render_subtree(&self, node: NodeId, depth: usize, out: &mut String) {
        if depth > TREE_DEPTH_LIMIT {
            return;
        }
        for (edge, (_, child)) in self.outgoing_edges(node) {
            let indent = "  ".repeat(depth);
            let _ = writeln!(
                out,
                "{}-\"{}\"-> {}",
                indent,
                self.edge_name(edge).unwrap_or("?"),
                self.describe_endpoint(child)
            );
            self.render_subtree(child, depth.saturating_add(1), out);
        }
    }

    /// `"name" (node 3, features: 2 {lemma, pos})` — key set only when
    /// non-empty.
    fn describe_node(&self, id: NodeId) -> String {
        let features = self.node_features(id);
        let mut line = format!(
            "\"{}\" (node {}, features: {}",
            self.node_name(id).unwrap_or("?"),
            id.value(),
            features.len()
        );
        if !features.is_empty() {
            let keys: Vec<&str> = features.keys().map(String::as_str).collect();
            let _ = write!(line, " {{{}}}", keys.join(", "));
        }
        line.push(')');
        line
    }

    /// `"name" (node 3, features: 2)` — endpoint form, count only.
    fn describe_endpoint(&self, id: NodeId) -> String {
        format!(
            "\"{}\" (node {}, features: {})",
            self.node_name(id).unwrap_or("?"),
            id.value(),
            self.node_features(id).len()
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureValue;

    #[test]
    fn node_list_covers_nodes_in_id_order() {
        let mut graph = Graph::new();
        let the = graph.add_node("the").expect("add");
        let cat = graph.add_node("cat").expect("add");
        graph.add_edge(the, cat, "det").expect("edge");
        graph.set_node_feature(cat, "pos", FeatureValue::from("NN"));
        graph.set_node_feature(cat, "lemma", FeatureValue::from("cat"));

        let text = graph.render(RenderMode::NodeList);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "\"the\" (node 1, features: 0)");
        assert_eq!(
            lines[1],
            "  -> \"det\" (edge 1) to \"cat\" (node 2, features: 2)"
        );
        // Feature key set listed in deterministic (sorted) order.
        assert_eq!(lines[2], "\"cat\" (node 2, features: 2 {lemma, pos})");
        assert_eq!(
            lines[3],
            "  <- \"det\" (edge 1) from \"the\" (node 1, features: 0)"
        );
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn tree_lists_isolated_roots() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        let b = graph.add_node("b").expect("add");
        graph.add_node("lone").expect("add");
        graph.add_edge(a, b, "rel").expect("edge");

        let text = graph.render(RenderMode::Tree);
        // `a` has an outgoing edge, so only the isolated node qualifies
        // as a root.
        assert_eq!(text, "root \"lone\" (node 3, features: 0)\n");
    }

    #[test]
    fn tree_render_is_bounded_on_cycles() {
        let mut graph = Graph::new();
        let a = graph.add_node("a").expect("add");
        let b = graph.add_node("b").expect("add");
        graph.add_edge(a, b, "next").expect("edge");
        graph.add_edge(b, a, "back").expect("edge");

        // Every node in the cycle touches an edge, so there is no root;
        // the rendering terminates with bounded (here: empty) output.
        let text = graph.render(RenderMode::Tree);
        assert!(text.is_empty());
    }

    #[test]
    fn subtree_recursion_respects_depth_cap() {
        let mut graph = Graph::new();
        // Chain three deeper than the cap.
        let mut prev = graph.add_node("n0").expect("add");
        for i in 1..=(TREE_DEPTH_LIMIT + 3) {
            let next = graph.add_node(&format!("n{i}")).expect("add");
            graph.add_edge(prev, next, "next").expect("edge");
            prev = next;
        }

        let mut out = String::new();
        let first = graph.nodes_by_name("n0").into_iter().next().expect("n0");
        graph.render_subtree(first, 1, &mut out);

        // Exactly TREE_DEPTH_LIMIT child lines; the tail is cut off.
        assert_eq!(out.lines().count(), TREE_DEPTH_LIMIT);
        assert!(out.contains(&format!("n{TREE_DEPTH_LIMIT}")));
        assert!(!out.contains(&format!("n{}", TREE_DEPTH_LIMIT + 1)));
    }

    #[test]
    fn empty_graph_renders_empty() {
        let graph = Graph::new();
        assert!(graph.render(RenderMode::NodeList).is_empty());
        assert!(graph.render(RenderMode::Tree).is_empty());
    }
}
