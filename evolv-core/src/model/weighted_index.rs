use crate::error::{ChainError, Result};

/// Occurrence counter type. Counts are never negative, but the signed type
/// lets callers hand over raw deltas that are validated on entry.
pub type Count = i64;

/// Growable counting structure over dense positions (a Fenwick tree).
///
/// Counts start at zero and only ever increase. The index grows on demand
/// when a position past its current end is touched, which is what happens
/// when the state coder discovers a new state in the middle of training.
///
/// ## Layout
/// `tree` is 1-based: slot `i` holds the sum of the counts at the 0-based
/// positions `[i - lowbit(i), i - 1]`. Slot 0 is unused, so
/// `tree.len() == size() + 1` at all times.
///
/// ## Invariants
/// - `total == Σ counts`
/// - growing never changes any prefix sum that was observable before
#[derive(Clone, Debug)]
pub struct WeightedIndex {
	tree: Vec<Count>,
	total: Count,
}

impl Default for WeightedIndex {
	fn default() -> Self {
		Self::new()
	}
}

#[inline]
fn lowbit(slot: usize) -> usize {
	slot & slot.wrapping_neg()
}

impl WeightedIndex {
	/// Creates an empty index (`size() == 0`).
	pub fn new() -> Self {
		Self { tree: vec![0], total: 0 }
	}

	/// Creates an index of `size` zero counts.
	pub fn with_size(size: usize) -> Self {
		Self { tree: vec![0; size + 1], total: 0 }
	}

	/// Number of addressable positions (highest position ever touched + 1).
	pub fn size(&self) -> usize {
		self.tree.len() - 1
	}

	/// Returns `true` if no weight was ever added.
	pub fn is_empty(&self) -> bool {
		self.total == 0
	}

	/// Sum of every count, O(1).
	pub fn total(&self) -> Count {
		self.total
	}

	/// Adds `delta` occurrences at `position`, growing the index if needed.
	///
	/// # Errors
	/// - `InvalidArgument` if `delta` is negative or would overflow the total.
	///
	/// Nothing is modified when an error is returned.
	pub fn add(&mut self, position: usize, delta: Count) -> Result<()> {
		if delta < 0 {
			return Err(ChainError::InvalidArgument(format!(
				"count delta must be non-negative, got {delta}"
			)));
		}
		let total = self.total.checked_add(delta).ok_or_else(|| {
			ChainError::InvalidArgument(format!("adding {delta} overflows the total count"))
		})?;

		if position >= self.size() {
			self.grow(position + 1);
		}

		let mut slot = position + 1;
		while slot < self.tree.len() {
			self.tree[slot] += delta;
			slot += lowbit(slot);
		}
		self.total = total;
		Ok(())
	}

	/// Sum of the counts at positions `[0, rb]`.
	///
	/// `rb` past the end is clamped to the last position; an empty index
	/// always answers 0.
	pub fn prefix_sum(&self, rb: usize) -> Count {
		if self.size() == 0 {
			return 0;
		}
		self.prefix(rb.min(self.size() - 1) + 1)
	}

	/// Sum of the counts at positions `[0, end)`.
	///
	/// `prefix_sum_exclusive(0)` is the empty prefix and is always 0.
	pub fn prefix_sum_exclusive(&self, end: usize) -> Count {
		self.prefix(end.min(self.size()))
	}

	/// Sum of the counts at positions `[lb, rb]`, 0 when `rb < lb`.
	pub fn range_sum(&self, lb: usize, rb: usize) -> Count {
		if rb < lb {
			return 0;
		}
		self.prefix_sum(rb) - self.prefix_sum_exclusive(lb)
	}

	/// Count stored at a single position (0 past the end).
	pub fn get(&self, position: usize) -> Count {
		self.range_sum(position, position)
	}

	/// Returns the smallest position whose prefix sum is greater than `x`.
	///
	/// Feeding a uniform `x` from `[0, total())` turns this into weighted
	/// sampling: every position is returned with probability
	/// `count / total`. Walks the tree by descending powers of two, so the
	/// cost is O(log size).
	///
	/// # Errors
	/// - `PreconditionViolated` if the index is empty or `x` is outside `[0, total())`.
	pub fn sample(&self, x: Count) -> Result<usize> {
		if self.total == 0 {
			return Err(ChainError::PreconditionViolated(
				"cannot sample from an index without weight".to_owned(),
			));
		}
		if x < 0 || x >= self.total {
			return Err(ChainError::PreconditionViolated(format!(
				"sample target {x} is outside [0, {})",
				self.total
			)));
		}

		let len = self.tree.len();
		let mut position = 0;
		let mut rest = x;
		let mut step = 1usize << (usize::BITS - 1 - len.leading_zeros());
		while step > 0 {
			let next = position + step;
			if next < len && self.tree[next] <= rest {
				position = next;
				rest -= self.tree[next];
			}
			step >>= 1;
		}
		Ok(position)
	}

	/// Raw prefix over the first `end` positions, `end <= size()`.
	fn prefix(&self, end: usize) -> Count {
		let mut slot = end;
		let mut sum = 0;
		while slot > 0 {
			sum += self.tree[slot];
			slot -= lowbit(slot);
		}
		sum
	}

	/// Extends the index to `new_size` positions.
	///
	/// Every new slot covers some old positions (possibly none) followed by
	/// new, zero-valued ones, so its value is the sum of the old part. That
	/// sum only reads slots `<= old_size`, all of which are already final.
	fn grow(&mut self, new_size: usize) {
		let old_size = self.size();
		if new_size <= old_size {
			return;
		}

		self.tree.resize(new_size + 1, 0);
		let old_prefix = self.prefix(old_size);
		for slot in old_size + 1..=new_size {
			let first = slot - lowbit(slot);
			if first < old_size {
				self.tree[slot] = old_prefix - self.prefix(first);
			}
		}
	}
}
