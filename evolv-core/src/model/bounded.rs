use log::{debug, trace};
use rand::Rng;
use rand::rngs::StdRng;

use super::memory::MemoryWindow;
use super::transition_table::TransitionTable;
use super::{Code, seeded_rng};
use crate::error::{ChainError, Result};

/// Markov chain remembering the `order` states visited before the current one.
///
/// While learning, each code is counted as a destination of every code that
/// precedes it by at most `order + 1` steps, in the row of the matching depth.
/// Prediction pools the rows selected by the memory window (current state at
/// depth 0, the one before it at depth 1, ...) and samples from their sum.
///
/// # Invariants
/// - `order >= 1`
/// - The memory window holds at most `order + 1` codes, latest first
#[derive(Clone, Debug)]
pub struct BoundedChain<R = StdRng> {
	order: usize,
	table: TransitionTable,
	memory: MemoryWindow,
	rng: R,
}

impl BoundedChain<StdRng> {
	/// Creates an empty chain of the given order.
	///
	/// With `seed == None` the generator is seeded from the OS entropy
	/// source and predictions are not reproducible.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `order < 1`.
	pub fn new(order: usize, seed: Option<u64>) -> Result<Self> {
		Self::with_rng(order, seeded_rng(seed))
	}
}

impl<R: Rng> BoundedChain<R> {
	/// Creates an empty chain drawing from the given generator.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `order < 1`.
	pub fn with_rng(order: usize, rng: R) -> Result<Self> {
		if order < 1 {
			return Err(ChainError::InvalidArgument(
				"a bounded chain must remember at least one previous state".to_owned(),
			));
		}
		Ok(Self {
			order,
			table: TransitionTable::new(),
			memory: MemoryWindow::new(order + 1),
			rng,
		})
	}

	/// Number of previous states remembered besides the current one.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Learns every transition of `codes` up to `order + 1` steps apart.
	///
	/// Given `s[0] .. s[i] .. s[i+N] ..`, for each depth `d` in `0..=N` the
	/// transition `s[i] -> s[i+d+1]` is counted in row `(s[i], d)`.
	///
	/// When `update_memory` is set, or when the chain has no memory yet, the
	/// trailing window of the sequence is walked into memory. An empty
	/// sequence changes nothing.
	pub fn ingest<I: IntoIterator<Item = Code>>(&mut self, codes: I, update_memory: bool) -> Result<()> {
		let mut codes = codes.into_iter();
		let Some(first) = codes.next() else {
			return Ok(());
		};

		let mut window = MemoryWindow::new(self.memory.capacity());
		window.push(first);
		let mut recorded = 0usize;
		for code in codes {
			for (depth, &source) in window.make_contiguous().iter().enumerate() {
				self.table.record_transition(source, depth, code)?;
				recorded += 1;
			}
			window.push(code);
		}

		if update_memory || self.memory.is_empty() {
			self.memory.extend(window.to_vec().into_iter().rev());
		}
		debug!(
			"Order {} chain learned {recorded} transitions, memory {:?}",
			self.order,
			self.memory.to_vec()
		);
		Ok(())
	}

	/// Draws the state following the current memory.
	///
	/// # Errors
	/// - `UninitializedState` if the memory is empty.
	/// - `NoObservedTransitions` if none of the memory rows holds any weight.
	pub fn predict(&mut self, update_memory: bool) -> Result<Code> {
		if self.memory.is_empty() {
			return Err(ChainError::UninitializedState);
		}

		let sources = self.memory.make_contiguous();
		let total = self.table.aggregate_total(sources);
		if total == 0 {
			return Err(ChainError::NoObservedTransitions);
		}

		let x = self.rng.random_range(0..total);
		let next = self.table.weighted_sample_across_depths(sources, x)?;
		trace!("Order {} draw {x}/{total} from {:?} -> {next}", self.order, sources);

		if update_memory {
			self.memory.push(next);
		}
		Ok(next)
	}

	/// Replaces the memory with `codes`, given oldest first.
	pub fn set_memory<I: IntoIterator<Item = Code>>(&mut self, codes: I) {
		self.memory.replace(codes);
	}

	/// Moves to `code`, forgetting the oldest remembered state if full.
	pub fn update_memory(&mut self, code: Code) {
		self.memory.push(code);
	}

	/// Walks through `codes` (oldest first).
	pub fn update_memory_many<I: IntoIterator<Item = Code>>(&mut self, codes: I) {
		self.memory.extend(codes);
	}

	/// Memory window, latest first.
	pub fn memory(&self) -> Vec<Code> {
		self.memory.to_vec()
	}

	pub fn memory_size(&self) -> usize {
		self.memory.capacity()
	}

	pub fn is_ready(&self) -> bool {
		!self.memory.is_empty()
	}

	pub fn table(&self) -> &TransitionTable {
		&self.table
	}
}
