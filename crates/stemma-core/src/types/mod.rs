//! # Core Type Definitions
//!
//! This module contains the value types shared by every layer of the engine:
//! - Graph identifiers (`NodeId`, `EdgeId`)
//! - Typed per-entity metadata (`FeatureValue`, `FeatureMap`)
//! - Error types (`StemmaError`)
//!
//! ## Determinism Guarantees
//!
//! Identifier types implement `Ord` so they can key `BTreeMap`/`BTreeSet`
//! and iterate in a stable order. Feature values may carry `f64` payloads,
//! but the engine never performs arithmetic on them; they are opaque
//! provenance data attached by the producing analysis stage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// GRAPH IDENTIFIERS
// =============================================================================

/// Unique identifier for a node within one graph instance.
///
/// Node ids are allocated from a per-graph monotonic counter (or supplied by
/// the caller to mirror externally minted ids, e.g. token ids). A node id is
/// never reused for the lifetime of its graph, even after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Unique identifier for an edge within one graph instance.
///
/// Edge ids live in their own id space, independent of node ids, with the
/// same no-reuse guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl NodeId {
    /// Get the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl EdgeId {
    /// Get the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

// =============================================================================
// FEATURE VALUES
// =============================================================================

/// A typed metadata value attached to a node or edge.
///
/// Producing stages use features to carry provenance: confidence scores,
/// POS tags, source annotation ids, character offsets. The variants cover
/// the primitive shapes those stages emit plus ordered lists of them.
///
/// Conversion out of a value is explicit: the `as_*` accessors return
/// `None` on a variant mismatch instead of coercing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Double-precision float (scores, probabilities).
    Float(f64),
    /// Free-form string.
    Str(String),
    /// Ordered list of values.
    List(Vec<FeatureValue>),
}

impl FeatureValue {
    /// View as a string slice, if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// View as a bool, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// View as an integer, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// View as a float, if this is a `Float`.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// View as a list slice, if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[FeatureValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FeatureValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for FeatureValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<FeatureValue>> for FeatureValue {
    fn from(items: Vec<FeatureValue>) -> Self {
        Self::List(items)
    }
}

/// Per-entity metadata map. Keys are never blank; writes are
/// last-write-wins.
pub type FeatureMap = BTreeMap<String, FeatureValue>;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the stemma engine and its tooling.
///
/// Input validation in the mutation and query layers never produces an
/// error: invalid input is signalled by `None`/`false`/empty returns that
/// callers are expected to check. `Hyperedge` is the one structural
/// invariant violation the engine treats as a hard failure, because the
/// engine itself never constructs such an edge.
#[derive(Debug, Error)]
pub enum StemmaError {
    /// An edge record holds other than exactly two endpoints.
    #[error("edge {edge:?} has {arity} endpoints, expected exactly 2")]
    Hyperedge {
        /// The malformed edge.
        edge: EdgeId,
        /// The number of endpoints actually recorded.
        arity: usize,
    },

    /// An I/O error occurred (binary-side file handling).
    #[error("I/O error: {0}")]
    Io(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// TESTS
// =============================================================================
