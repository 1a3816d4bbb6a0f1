use std::collections::HashMap;

use super::Code;
use super::weighted_index::{Count, WeightedIndex};
use crate::error::{ChainError, Result};

/// Transition counts keyed by `(source, depth)`.
///
/// Row `(s, d)` counts every destination that was observed `d + 1` steps
/// after `s` in the training data. Depth 0 is the classic Markov transition;
/// deeper rows are what lets a bounded-order chain remember more than its
/// current state.
///
/// ## Invariants
/// - Rows are created on first write and never removed
/// - `max_observed_code` is the largest source or destination ever recorded
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
	rows: HashMap<(Code, usize), WeightedIndex>,
	max_observed_code: Code,
}

impl TransitionTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `dest` seen `depth + 1` steps after `source`.
	pub fn record_transition(&mut self, source: Code, depth: usize, dest: Code) -> Result<()> {
		self.rows.entry((source, depth)).or_default().add(dest, 1)?;
		self.max_observed_code = self.max_observed_code.max(source).max(dest);
		Ok(())
	}

	/// Returns the row for `(source, depth)` if anything was recorded there.
	pub fn row(&self, source: Code, depth: usize) -> Option<&WeightedIndex> {
		self.rows.get(&(source, depth))
	}

	/// Total weight of a row, 0 when the row does not exist.
	pub fn row_total(&self, source: Code, depth: usize) -> Count {
		self.row(source, depth).map_or(0, WeightedIndex::total)
	}

	/// Number of rows created so far.
	pub fn row_count(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Largest code ever recorded (0 while the table is empty).
	pub fn max_observed_code(&self) -> Code {
		self.max_observed_code
	}

	/// Samples a destination from the depth 0 row of `source`.
	///
	/// # Errors
	/// - `PreconditionViolated` if the row does not exist or `x` is outside its total.
	pub fn sample_depth0(&self, source: Code, x: Count) -> Result<Code> {
		self.row(source, 0)
			.ok_or_else(|| {
				ChainError::PreconditionViolated(format!("no transitions recorded from {source}"))
			})?
			.sample(x)
	}

	/// Sums the row totals of `active_sources`, where the i-th source is
	/// read at depth i. Missing rows contribute nothing.
	pub fn aggregate_total(&self, active_sources: &[Code]) -> Count {
		active_sources
			.iter()
			.enumerate()
			.map(|(depth, &source)| self.row_total(source, depth))
			.sum()
	}

	/// Samples a destination from the union of the rows selected by
	/// `active_sources` (i-th source at depth i), weighted by their counts.
	///
	/// Instead of merging the rows into one distribution, this binary
	/// searches the destination code space `[0, max_observed_code]`. At every
	/// probe `mid` the aggregated prefix sum is the sum of each row's
	/// `prefix_sum(mid)`. Each term is non-decreasing in `mid` and a missing
	/// row is a constant 0, so the aggregate is non-decreasing as well and the
	/// search finds the smallest code whose aggregate prefix exceeds `x`.
	///
	/// # Errors
	/// - `PreconditionViolated` if `x` is outside `[0, aggregate_total(active_sources))`.
	pub fn weighted_sample_across_depths(&self, active_sources: &[Code], x: Count) -> Result<Code> {
		let total = self.aggregate_total(active_sources);
		if x < 0 || x >= total {
			return Err(ChainError::PreconditionViolated(format!(
				"sample target {x} is outside [0, {total})"
			)));
		}

		let rows: Vec<&WeightedIndex> = active_sources
			.iter()
			.enumerate()
			.filter_map(|(depth, &source)| self.row(source, depth))
			.collect();

		let (mut lb, mut rb) = (0, self.max_observed_code);
		while lb < rb {
			let mid = lb + (rb - lb) / 2;
			let sum: Count = rows.iter().map(|row| row.prefix_sum(mid)).sum();
			if sum <= x {
				lb = mid + 1;
			} else {
				rb = mid;
			}
		}
		Ok(lb)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rows_are_created_lazily() {
		let mut table = TransitionTable::new();
		assert!(table.is_empty());
		assert_eq!(table.row_total(3, 0), 0);
		assert!(table.row(3, 0).is_none());

		table.record_transition(3, 0, 5).unwrap();
		table.record_transition(3, 0, 5).unwrap();
		table.record_transition(3, 1, 2).unwrap();

		assert_eq!(table.row_count(), 2);
		assert_eq!(table.row_total(3, 0), 2);
		assert_eq!(table.row_total(3, 1), 1);
		assert_eq!(table.row(3, 0).map(|row| row.get(5)), Some(2));
		assert_eq!(table.max_observed_code(), 5);
	}

	#[test]
	fn max_code_tracks_sources_too() {
		let mut table = TransitionTable::new();
		table.record_transition(9, 0, 1).unwrap();
		assert_eq!(table.max_observed_code(), 9);
	}

	#[test]
	fn depth0_sampling() {
		let mut table = TransitionTable::new();
		table.record_transition(0, 0, 1).unwrap();
		table.record_transition(0, 0, 3).unwrap();
		table.record_transition(0, 0, 3).unwrap();

		assert_eq!(table.sample_depth0(0, 0), Ok(1));
		assert_eq!(table.sample_depth0(0, 1), Ok(3));
		assert_eq!(table.sample_depth0(0, 2), Ok(3));
		assert!(matches!(table.sample_depth0(0, 3), Err(ChainError::PreconditionViolated(_))));
		assert!(matches!(table.sample_depth0(7, 0), Err(ChainError::PreconditionViolated(_))));
	}

	#[test]
	fn aggregate_skips_missing_rows() {
		let mut table = TransitionTable::new();
		table.record_transition(0, 0, 1).unwrap();
		table.record_transition(0, 0, 1).unwrap();
		table.record_transition(1, 1, 3).unwrap();

		assert_eq!(table.aggregate_total(&[0, 1]), 3);
		assert_eq!(table.aggregate_total(&[0, 4]), 2);
		assert_eq!(table.aggregate_total(&[4, 1]), 1);
		assert_eq!(table.aggregate_total(&[]), 0);
	}

	#[test]
	fn sampling_across_depths_inverts_the_merged_distribution() {
		// depth 0 from 0: {1: 2}; depth 1 from 1: {1: 1, 3: 2}
		let mut table = TransitionTable::new();
		table.record_transition(0, 0, 1).unwrap();
		table.record_transition(0, 0, 1).unwrap();
		table.record_transition(1, 1, 3).unwrap();
		table.record_transition(1, 1, 1).unwrap();
		table.record_transition(1, 1, 3).unwrap();

		let memory = [0, 1];
		assert_eq!(table.aggregate_total(&memory), 5);
		let drawn: Vec<Code> = (0..5)
			.map(|x| table.weighted_sample_across_depths(&memory, x).unwrap())
			.collect();
		assert_eq!(drawn, vec![1, 1, 1, 3, 3]);
	}

	#[test]
	fn sampling_across_depths_with_absent_rows() {
		let mut table = TransitionTable::new();
		table.record_transition(2, 0, 4).unwrap();
		table.record_transition(5, 0, 0).unwrap();

		// depth 1 row of 7 does not exist and must not disturb the search
		assert_eq!(table.weighted_sample_across_depths(&[2, 7], 0), Ok(4));
		assert!(matches!(
			table.weighted_sample_across_depths(&[2, 7], 1),
			Err(ChainError::PreconditionViolated(_))
		));
		assert!(matches!(
			table.weighted_sample_across_depths(&[7], 0),
			Err(ChainError::PreconditionViolated(_))
		));
	}
}
