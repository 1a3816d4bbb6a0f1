use log::{debug, trace};
use rand::Rng;
use rand::rngs::StdRng;

use super::memory::MemoryWindow;
use super::transition_table::TransitionTable;
use super::{Code, seeded_rng};
use crate::error::{ChainError, Result};

/// Markov chain that only knows its current state.
///
/// Learning counts, for every state, how often each other state directly
/// follows it. Prediction draws the next state with a probability
/// proportional to those counts.
///
/// # Invariants
/// - Only depth 0 rows of the transition table are ever written
/// - The memory window holds at most one code
#[derive(Clone, Debug)]
pub struct MemorylessChain<R = StdRng> {
	table: TransitionTable,
	memory: MemoryWindow,
	rng: R,
}

impl MemorylessChain<StdRng> {
	/// Creates an empty chain.
	///
	/// With `seed == None` the generator is seeded from the OS entropy
	/// source and predictions are not reproducible.
	pub fn new(seed: Option<u64>) -> Self {
		Self::with_rng(seeded_rng(seed))
	}
}

impl<R: Rng> MemorylessChain<R> {
	/// Creates an empty chain drawing from the given generator.
	pub fn with_rng(rng: R) -> Self {
		Self { table: TransitionTable::new(), memory: MemoryWindow::new(1), rng }
	}

	/// Learns every adjacent transition of `codes`.
	///
	/// The chain moves to the last code when `update_memory` is set or when
	/// it has no current state yet. An empty sequence changes nothing.
	pub fn ingest<I: IntoIterator<Item = Code>>(&mut self, codes: I, update_memory: bool) -> Result<()> {
		let mut codes = codes.into_iter();
		let Some(mut state) = codes.next() else {
			return Ok(());
		};

		let mut recorded = 0usize;
		for code in codes {
			self.table.record_transition(state, 0, code)?;
			state = code;
			recorded += 1;
		}

		if update_memory || self.memory.is_empty() {
			self.memory.push(state);
		}
		debug!("Memoryless chain learned {recorded} transitions, current state {state}");
		Ok(())
	}

	/// Draws the state following the current one.
	///
	/// # Errors
	/// - `UninitializedState` if the chain has no current state.
	/// - `NoObservedTransitions` if nothing was ever seen after the current state.
	pub fn predict(&mut self, update_memory: bool) -> Result<Code> {
		let current = self.memory.front().ok_or(ChainError::UninitializedState)?;
		let total = self.table.row_total(current, 0);
		if total == 0 {
			return Err(ChainError::NoObservedTransitions);
		}

		let x = self.rng.random_range(0..total);
		let next = self.table.sample_depth0(current, x)?;
		trace!("Memoryless draw {x}/{total} from {current} -> {next}");

		if update_memory {
			self.memory.push(next);
		}
		Ok(next)
	}

	/// Replaces the current state with the last of `codes`.
	pub fn set_memory<I: IntoIterator<Item = Code>>(&mut self, codes: I) {
		self.memory.replace(codes);
	}

	/// Moves to `code`.
	pub fn update_memory(&mut self, code: Code) {
		self.memory.push(code);
	}

	/// Walks through `codes`, ending on the last one.
	pub fn update_memory_many<I: IntoIterator<Item = Code>>(&mut self, codes: I) {
		self.memory.extend(codes);
	}

	/// Current state as a one-element vector, or empty.
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
