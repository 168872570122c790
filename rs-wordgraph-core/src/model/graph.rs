use std::collections::{BTreeSet, HashMap};

use rand::Rng;

use super::token::Token;
use super::vertex::VertexState;
use crate::error::Result;

/// Represents a directed, weighted graph of word transitions.
///
/// The `WeightedGraph` maps every token that has been the source of a
/// connection to its `VertexState`. Tokens only ever seen as destinations are
/// not vertices.
///
/// # Responsibilities
/// - Accumulate connections between adjacent tokens
/// - Answer "heaviest", "weighted random" and "top k" queries by source
/// - Merge with another graph (parallel ingestion)
///
/// # Invariants
/// - Every vertex has at least one outgoing edge
/// - The graph only grows: vertices and edges are never removed
#[derive(Clone, Debug, Default)]
pub struct WeightedGraph {
	/// Mapping from a source token to its outgoing edges
	vertices: HashMap<Token, VertexState>,
}

impl WeightedGraph {
	/// Creates an empty graph.
	pub fn new() -> Self {
		Self { vertices: HashMap::new() }
	}

	/// Adds one occurrence of the connection `source -> destination`.
	///
	/// Creates the vertex and/or the edge on first sight.
	///
	/// # Errors
	/// Returns `GraphError::InvalidToken` if either token is empty or contains
	/// whitespace. The graph is left untouched in that case.
	pub fn add_connection(&mut self, source: &str, destination: &str) -> Result<()> {
		let destination = Token::new(destination, "destination")?;
		match self.vertices.get_mut(source) {
			Some(vertex) => {
				vertex.add_transition(&destination);
			}
			None => {
				let source = Token::new(source, "source")?;
				self.vertices.entry(source).or_default().add_transition(&destination);
			}
		}
		Ok(())
	}

	/// The destination with the greatest weight from `source`.
	///
	/// Ties are broken by the lexicographically smallest destination.
	/// Returns `None` if `source` is unknown.
	pub fn get_max(&self, source: &str) -> Option<Token> {
		self.vertices.get(source)?.max_destination().cloned()
	}

	/// A destination drawn from `source` with probability equal to its weight,
	/// using the calling thread's generator.
	pub fn get_random(&self, source: &str) -> Option<Token> {
		self.get_random_with(source, &mut rand::rng())
	}

	/// Same as `get_random`, drawing from the given generator.
	pub fn get_random_with<R: Rng + ?Sized>(&self, source: &str, rng: &mut R) -> Option<Token> {
		self.vertices.get(source)?.random_destination(rng).cloned()
	}

	/// Up to `k` destinations from `source`, by weight descending and
	/// lexicographically ascending on ties.
	///
	/// `k == 0` and unknown sources give an empty list; `k` larger than the
	/// out-degree gives every destination.
	pub fn get_top_k(&self, source: &str, k: usize) -> Vec<Token> {
		match self.vertices.get(source) {
			Some(vertex) => vertex.top_destinations(k).cloned().collect(),
			None => Vec::new(),
		}
	}

	/// Every token that has been the source of a connection.
	pub fn vertices(&self) -> BTreeSet<Token> {
		self.vertices.keys().cloned().collect()
	}

	/// Number of source tokens.
	pub fn size(&self) -> usize {
		self.vertices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty()
	}

	/// Read access to the state of a single vertex.
	pub fn vertex(&self, source: &str) -> Option<&VertexState> {
		self.vertices.get(source)
	}

	/// Iterates over `(source, vertex)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&Token, &VertexState)> {
		self.vertices.iter()
	}

	pub(crate) fn insert_vertex(&mut self, source: Token, vertex: VertexState) {
		if !vertex.is_empty() {
			self.vertices.insert(source, vertex);
		}
	}

	/// Merges another graph into this one.
	///
	/// Counts of matching edges are summed; unknown vertices are cloned.
	pub fn merge(&mut self, other: &Self) {
		for (source, vertex) in &other.vertices {
			if let Some(existing) = self.vertices.get_mut(source) {
				existing.merge(vertex);
			} else {
				self.vertices.insert(source.clone(), vertex.clone());
			}
		}
	}
}

impl IntoIterator for WeightedGraph {
	type Item = (Token, VertexState);
	type IntoIter = std::collections::hash_map::IntoIter<Token, VertexState>;

	fn into_iter(self) -> Self::IntoIter {
		self.vertices.into_iter()
	}
}
