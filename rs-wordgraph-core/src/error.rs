use std::io;

/// Errors raised at the boundaries of the word graph.
///
/// Unknown sources and missing edges are not errors: lookups return
/// `None` or an empty list for them.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// A token passed to the graph was empty or contained whitespace.
	#[error("invalid {role} token {token:?}: tokens must be non-empty and contain no whitespace")]
	InvalidToken {
		role: &'static str,
		token: String,
	},

	#[error("invalid generation mode {0:?}, expected \"all\" or \"one\"")]
	InvalidGenerationMode(String),

	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// A parallel ingestion worker stopped before handing back its partial graph.
	#[error("ingestion worker stopped before sending its partial graph")]
	WorkerLost,

	#[error(transparent)]
	Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
