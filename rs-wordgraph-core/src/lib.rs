//! Weighted word-graph library.
//!
//! This crate provides a word transition graph for text generation including:
//! - Incremental edge counting with no rebuild
//! - Heaviest, weighted-random and top-k successor queries
//! - Concurrent access with per-vertex locking
//! - Corpus ingestion and generation walks
//!
//! Index structures are kept internal so that they can only change through
//! the vertex that owns them.

/// Core graph structures and generation logic.
pub mod model;

/// Word normalization and corpus ingestion.
pub mod ingest;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (file loading, folder listing).
pub mod io;

pub use error::{GraphError, Result};
pub use model::generator::{GenerationInput, GenerationMode, MAX_WORDS, Walkable, generate, generate_text};
pub use model::graph::WeightedGraph;
pub use model::report::{EdgeReport, VertexReport};
pub use model::shared::SharedGraph;
pub use model::token::Token;
pub use model::vertex::{Edge, VertexState};
