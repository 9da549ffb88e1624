//! # stemma-core
//!
//! The named, attributed directed multigraph engine for stemma - THE ENGINE.
//!
//! This crate is the structural substrate on which the text-mining pipeline
//! stores its derived linguistic structures: per-sentence dependency graphs,
//! document outline trees, citation and coreference link sets. It maintains
//! bidirectional consistency between integer identities, display names and
//! per-entity metadata, supports safe cascading deletion, and renders two
//! textual serializations for debugging and export.
//!
//! ## Layers
//!
//! - Identity & Mutation (`graph`): id allocation, naming, feature writes,
//!   cascading removal
//! - Query (`query`): children/parents/roots, incident and outgoing edges,
//!   name and feature lookups
//! - Serialization (`render`, `export`): node-list and tree text renderings,
//!   flattened edge rows, the JSON-facing graph document
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no I/O, no network dependencies
//! - Deterministic: `BTreeMap`/`BTreeSet` only, stable iteration order
//! - Single-writer: one graph instance per logical unit of analysis;
//!   callers impose their own locking if they share one
//! - Invalid input fails locally (`None`/`false`/`0`), never panics; the
//!   one hard failure is the hyperedge invariant check

// =============================================================================
// MODULES
// =============================================================================

pub mod export;
pub mod graph;
pub mod primitives;
pub mod query;
pub mod render;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{EdgeId, FeatureMap, FeatureValue, NodeId, StemmaError};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use export::{EdgeDoc, EdgeRow, GraphDoc, ImportReport, NodeDoc, edge_rows};
pub use graph::Graph;
pub use render::RenderMode;
