//! Top-level module for the word graph.
//!
//! This module provides the weighted adjacency structure and everything
//! built on it, including:
//! - Validated vertex identifiers (`Token`)
//! - Per-vertex indexes (`WeightedSampler`, `OrderStatisticIndex`)
//! - Per-vertex state (`VertexState`)
//! - Single-threaded and shared graphs (`WeightedGraph`, `SharedGraph`)
//! - Text generation walks over a graph (`generate`)

/// Normalized, immutable word used as a vertex identifier.
pub mod token;

/// Fenwick tree over edge counts for O(log k) weighted draws.
///
/// Internal to a vertex, not exposed publicly.
mod sampler;

/// Ordered index of the edges of a vertex, heaviest first.
///
/// Internal to a vertex, not exposed publicly.
mod order;

/// Edge table of one source token and the two indexes kept over it.
pub mod vertex;

/// Mapping from source tokens to their vertex.
///
/// Handles connection counting, max / random / top-k queries and merging.
pub mod graph;

/// Thread-safe graph with one lock per vertex.
pub mod shared;

/// Generation walks and their settings.
pub mod generator;

/// Serializable snapshots of vertices for diagnostics.
pub mod report;
