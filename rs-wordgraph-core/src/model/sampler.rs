use rand::Rng;

/// Cumulative-count index used to draw an edge with probability equal to its weight.
///
/// Edges are addressed by their slot, the position they were given in the
/// owning vertex's edge table. The sampler stores partial sums of counts in a
/// Fenwick tree, never weights: a weight is `count / total` and is only ever
/// implied by where a variate lands.
///
/// ## Complexity (k = number of slots)
/// - `push`: O(log k)
/// - `add`: O(log k)
/// - `locate` / `sample`: O(log k)
///
/// ## Invariants
/// - `tree[i]` holds the sum of counts for slots `(i - lowbit(i), i]` (1-based)
/// - Every slot carries a count >= 1, so no interval is empty
#[derive(Clone, Debug)]
pub(crate) struct WeightedSampler {
	/// 1-based Fenwick array, `tree[0]` is unused.
	tree: Vec<u64>,
}

impl Default for WeightedSampler {
	fn default() -> Self {
		Self { tree: vec![0] }
	}
}

#[inline]
fn lowbit(i: usize) -> usize {
	i & i.wrapping_neg()
}

impl WeightedSampler {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Number of slots indexed.
	pub(crate) fn len(&self) -> usize {
		self.tree.len() - 1
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Sum of the counts of the first `n` slots.
	fn prefix(&self, mut n: usize) -> u64 {
		let mut sum = 0;
		while n > 0 {
			sum += self.tree[n];
			n -= lowbit(n);
		}
		sum
	}

	/// Sum of every count in the sampler.
	pub(crate) fn total(&self) -> u64 {
		self.prefix(self.len())
	}

	/// Appends a new slot carrying `count` and returns its index.
	///
	/// The new Fenwick node covers `(i - lowbit(i), i]`, so its value is
	/// `count` plus the counts of the slots it spans before itself.
	pub(crate) fn push(&mut self, count: u64) -> usize {
		let i = self.tree.len();
		let covered = self.prefix(i - 1) - self.prefix(i - lowbit(i));
		self.tree.push(count + covered);
		i - 1
	}

	/// Adds `delta` to the count of `slot`.
	pub(crate) fn add(&mut self, slot: usize, delta: u64) {
		debug_assert!(slot < self.len(), "slot {slot} out of range");
		let mut i = slot + 1;
		while i < self.tree.len() {
			self.tree[i] += delta;
			i += lowbit(i);
		}
	}

	/// Current count of `slot`, recovered from the partial sums.
	pub(crate) fn count(&self, slot: usize) -> u64 {
		self.prefix(slot + 1) - self.prefix(slot)
	}

	/// Finds the slot whose cumulative interval contains `target`.
	///
	/// Slot `s` owns the half-open integer range `[prefix(s), prefix(s + 1))`,
	/// so adjacent intervals never overlap and never leave a gap.
	/// Returns `None` if `target >= total`.
	fn find(&self, mut target: u64) -> Option<usize> {
		let n = self.len();
		if n == 0 {
			return None;
		}

		let mut pos = 0;
		let mut step = 1usize << (usize::BITS - 1 - n.leading_zeros());
		while step > 0 {
			let next = pos + step;
			if next <= n && self.tree[next] <= target {
				pos = next;
				target -= self.tree[next];
			}
			step >>= 1;
		}

		// `pos` counts the slots whose cumulative sum stays <= target
		(pos < n).then_some(pos)
	}

	/// Maps a uniform variate in `[0, 1)` onto a slot.
	///
	/// The variate is scaled to the integer `floor(u * total)` before the
	/// search, so boundary comparisons happen on exact integers.
	/// Out-of-range variates are clamped.
	pub(crate) fn locate(&self, variate: f64, total: u64) -> Option<usize> {
		if total == 0 || self.is_empty() {
			return None;
		}
		if self.len() == 1 {
			return Some(0);
		}

		let scaled = (variate.clamp(0.0, 1.0) * total as f64) as u64;
		self.find(scaled.min(total - 1))
	}

	/// Draws a slot with probability `count(slot) / total`.
	pub(crate) fn sample<R: Rng + ?Sized>(&self, total: u64, rng: &mut R) -> Option<usize> {
		if self.is_empty() {
			return None;
		}
		self.locate(rng.random::<f64>(), total)
	}
}
