use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::token::Token;

/// Sort key of an edge inside a vertex's order index.
///
/// All edges of a vertex share the same denominator, so ordering by count is
/// ordering by weight. Higher counts sort first; equal counts fall back to the
/// lexicographically smallest destination.
#[derive(Clone, Debug, PartialEq, Eq)]
struct RankKey {
	count: u64,
	destination: Token,
}

impl Ord for RankKey {
	fn cmp(&self, other: &Self) -> Ordering {
		other
			.count
			.cmp(&self.count)
			.then_with(|| self.destination.cmp(&other.destination))
	}
}

impl PartialOrd for RankKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Ordered index over the edges of one vertex, heaviest first.
///
/// The index only holds destination keys and the count they were last
/// ranked with; the owning vertex tells it when a count moves.
///
/// ## Complexity (k = out-degree)
/// - `insert` / `reposition`: O(log k)
/// - `peek_max`: O(log k)
/// - `top(m)`: O(log k + m), without touching the index
#[derive(Clone, Debug, Default)]
pub(crate) struct OrderStatisticIndex {
	keys: BTreeSet<RankKey>,
}

impl OrderStatisticIndex {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn len(&self) -> usize {
		self.keys.len()
	}

	/// Indexes a destination that was not present before.
	pub(crate) fn insert(&mut self, destination: Token, count: u64) {
		let inserted = self.keys.insert(RankKey { count, destination });
		debug_assert!(inserted, "destination indexed twice");
	}

	/// Moves `destination` from its `old` rank to its `new` one.
	///
	/// Only the affected key is touched; the rest of the order is untouched.
	pub(crate) fn reposition(&mut self, destination: &Token, old: u64, new: u64) {
		let stale = RankKey { count: old, destination: destination.clone() };
		let removed = self.keys.remove(&stale);
		debug_assert!(removed, "stale rank for {destination} not found");
		self.keys.insert(RankKey { count: new, destination: stale.destination });
	}

	/// Heaviest destination, ties going to the smallest destination.
	pub(crate) fn peek_max(&self) -> Option<&Token> {
		self.keys.first().map(|key| &key.destination)
	}

	/// The `m` heaviest destinations, in rank order.
	pub(crate) fn top(&self, m: usize) -> impl Iterator<Item = &Token> {
		self.keys.iter().take(m).map(|key| &key.destination)
	}

	/// Every indexed `(destination, count)` pair, in rank order.
	pub(crate) fn ranked(&self) -> impl Iterator<Item = (&Token, u64)> {
		self.keys.iter().map(|key| (&key.destination, key.count))
	}
}
