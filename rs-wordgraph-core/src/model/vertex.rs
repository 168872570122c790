use std::collections::HashMap;

use rand::Rng;

use super::order::OrderStatisticIndex;
use super::sampler::WeightedSampler;
use super::token::Token;

/// An outgoing edge of a vertex, stored in the vertex's edge table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	destination: Token,
	count: u64,
}

impl Edge {
	pub fn destination(&self) -> &Token {
		&self.destination
	}

	/// How many times the pair `(source, destination)` was observed.
	pub fn count(&self) -> u64 {
		self.count
	}
}

/// Represents a vertex of the word graph.
///
/// A `VertexState` corresponds to one source token and owns every observed
/// transition from it to a next token, together with the two indexes built
/// over them.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their share of the observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Keep the order index and the sampler in step with the counts
/// - Answer "heaviest", "weighted random" and "top k" queries
/// - Merge with another vertex of the same source (parallel learning support)
///
/// ## Invariants
/// - `total_count` equals the sum of all edge counts
/// - Each edge count is strictly positive and never decreases
/// - Edge slot `i` in `edges` is slot `i` in the sampler, and every destination
///   in `slots` is ranked exactly once in `order` with its current count
/// - Weights are never stored, only derived as `count / total_count`
#[derive(Clone, Debug, Default)]
pub struct VertexState {
	/// Edge table, in order of first observation.
	edges: Vec<Edge>,
	/// Destination -> slot in `edges`.
	slots: HashMap<Token, usize>,
	total_count: u64,
	order: OrderStatisticIndex,
	sampler: WeightedSampler,
}

impl VertexState {
	/// Creates a vertex without any outgoing edge.
	pub fn new() -> Self {
		Self {
			edges: Vec::new(),
			slots: HashMap::new(),
			total_count: 0,
			order: OrderStatisticIndex::new(),
			sampler: WeightedSampler::new(),
		}
	}

	/// Records one occurrence of a transition toward `destination`.
	///
	/// Returns the new count of the edge.
	pub fn add_transition(&mut self, destination: &Token) -> u64 {
		self.add_occurrences(destination, 1)
	}

	/// Records `occurrences` observations of the edge toward `destination`.
	///
	/// - If the edge already exists, its count is increased and it is
	///   repositioned in both indexes.
	/// - Otherwise a new edge is created with `occurrences` as its count.
	///
	/// Both paths are O(log k). Returns the new count of the edge.
	pub(crate) fn add_occurrences(&mut self, destination: &Token, occurrences: u64) -> u64 {
		debug_assert!(occurrences > 0, "edge counts only grow");

		let count = match self.slots.get(destination.as_str()) {
			Some(&slot) => {
				let edge = &mut self.edges[slot];
				let old = edge.count;
				edge.count += occurrences;
				self.order.reposition(&edge.destination, old, edge.count);
				self.sampler.add(slot, occurrences);
				edge.count
			}
			None => {
				let slot = self.sampler.push(occurrences);
				debug_assert_eq!(slot, self.edges.len());
				self.edges.push(Edge { destination: destination.clone(), count: occurrences });
				self.slots.insert(destination.clone(), slot);
				self.order.insert(destination.clone(), occurrences);
				occurrences
			}
		};
		self.total_count += occurrences;

		debug_assert_eq!(self.sampler.total(), self.total_count);
		count
	}

	/// Sum of all edge counts.
	pub fn total_count(&self) -> u64 {
		self.total_count
	}

	/// Number of distinct destinations.
	pub fn out_degree(&self) -> usize {
		self.edges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.edges.is_empty()
	}

	/// Count of the edge toward `destination`, if any.
	pub fn count(&self, destination: &str) -> Option<u64> {
		self.slots.get(destination).map(|&slot| self.edges[slot].count)
	}

	/// Weight of the edge toward `destination`: its count over the vertex total.
	pub fn weight(&self, destination: &str) -> Option<f64> {
		self.count(destination).map(|count| count as f64 / self.total_count as f64)
	}

	/// Edges in order of first observation.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.iter()
	}

	/// The destination with the greatest weight, ties going to the
	/// lexicographically smallest one.
	pub fn max_destination(&self) -> Option<&Token> {
		self.order.peek_max()
	}

	/// Draws a destination with probability equal to its weight.
	pub fn random_destination<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Token> {
		let slot = self.sampler.sample(self.total_count, rng)?;
		Some(&self.edges[slot].destination)
	}

	/// The destination owning the cumulative interval that contains `variate`.
	///
	/// `variate` is expected in `[0, 1)`; `random_destination` feeds it from an `Rng`.
	pub fn destination_at(&self, variate: f64) -> Option<&Token> {
		let slot = self.sampler.locate(variate, self.total_count)?;
		Some(&self.edges[slot].destination)
	}

	/// Up to `k` destinations by weight descending, ties ascending.
	pub fn top_destinations(&self, k: usize) -> impl Iterator<Item = &Token> {
		self.order.top(k)
	}

	/// Every edge by weight descending, ties ascending, with its count.
	pub fn ranked_edges(&self) -> impl Iterator<Item = (&Token, u64)> {
		self.order.ranked()
	}

	/// Merges another vertex of the same source into this one.
	///
	/// Occurrence counts of matching destinations are summed, new destinations
	/// are appended. Each edge goes through the regular O(log k) update path.
	///
	/// This method is intended for parallel learning, where multiple partial
	/// graphs are combined into a single one.
	pub fn merge(&mut self, other: &Self) {
		for edge in &other.edges {
			self.add_occurrences(&edge.destination, edge.count);
		}
	}

	/// Checks that both indexes agree with the edge table.
	///
	/// O(k log k); meant for tests and debug assertions.
	pub fn is_consistent(&self) -> bool {
		let sum: u64 = self.edges.iter().map(Edge::count).sum();
		if sum != self.total_count || self.sampler.total() != sum {
			return false;
		}
		if self.order.len() != self.edges.len() || self.sampler.len() != self.edges.len() {
			return false;
		}

		let sampler_agrees = self
			.edges
			.iter()
			.enumerate()
			.all(|(slot, edge)| self.sampler.count(slot) == edge.count && self.slots.get(edge.destination.as_str()) == Some(&slot));
		let order_agrees = self.order.ranked().all(|(destination, count)| self.count(destination) == Some(count));

		sampler_agrees && order_agrees
	}
}
