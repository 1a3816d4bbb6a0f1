use log::debug;
use rand::Rng;
use rand::rngs::StdRng;

use super::{Code, seeded_rng};
use super::bounded::BoundedChain;
use super::config::ChainConfig;
use super::memoryless::MemorylessChain;
use super::transition_table::TransitionTable;
use crate::error::Result;

/// A chain operating on codes, either memoryless or of bounded order.
///
/// Both variants share the same contract; this enum only picks which
/// implementation answers. A chain is *ready* once its memory holds at
/// least one code, and only a ready chain can predict.
#[derive(Clone, Debug)]
pub enum ChainModel<R = StdRng> {
	Memoryless(MemorylessChain<R>),
	BoundedOrder(BoundedChain<R>),
}

impl ChainModel<StdRng> {
	/// Builds a memoryless chain when `memory == 0`, a chain of order
	/// `memory` otherwise.
	///
	/// With `seed == None` predictions are not reproducible.
	pub fn new(memory: usize, seed: Option<u64>) -> Result<Self> {
		debug!("Creating chain remembering {memory} previous states, seed {seed:?}");
		Self::with_rng(memory, seeded_rng(seed))
	}

	pub fn from_config(config: &ChainConfig) -> Result<Self> {
		Self::new(config.memory, config.seed)
	}
}

impl<R: Rng> ChainModel<R> {
	/// Same as [`ChainModel::new`] with a caller supplied generator.
	pub fn with_rng(memory: usize, rng: R) -> Result<Self> {
		if memory == 0 {
			Ok(Self::Memoryless(MemorylessChain::with_rng(rng)))
		} else {
			Ok(Self::BoundedOrder(BoundedChain::with_rng(memory, rng)?))
		}
	}

	/// Learns from a sequence of codes, see [`MemorylessChain::ingest`] and
	/// [`BoundedChain::ingest`].
	pub fn ingest<I: IntoIterator<Item = Code>>(&mut self, codes: I, update_memory: bool) -> Result<()> {
		match self {
			Self::Memoryless(chain) => chain.ingest(codes, update_memory),
			Self::BoundedOrder(chain) => chain.ingest(codes, update_memory),
		}
	}

	/// Draws the next code from the current memory.
	pub fn predict(&mut self, update_memory: bool) -> Result<Code> {
		match self {
			Self::Memoryless(chain) => chain.predict(update_memory),
			Self::BoundedOrder(chain) => chain.predict(update_memory),
		}
	}

	pub fn set_memory<I: IntoIterator<Item = Code>>(&mut self, codes: I) {
		match self {
			Self::Memoryless(chain) => chain.set_memory(codes),
			Self::BoundedOrder(chain) => chain.set_memory(codes),
		}
	}

	pub fn update_memory(&mut self, code: Code) {
		match self {
			Self::Memoryless(chain) => chain.update_memory(code),
			Self::BoundedOrder(chain) => chain.update_memory(code),
		}
	}

	pub fn update_memory_many<I: IntoIterator<Item = Code>>(&mut self, codes: I) {
		match self {
			Self::Memoryless(chain) => chain.update_memory_many(codes),
			Self::BoundedOrder(chain) => chain.update_memory_many(codes),
		}
	}

	/// Memory window, latest first. Empty until the chain is ready.
	pub fn memory(&self) -> Vec<Code> {
		match self {
			Self::Memoryless(chain) => chain.memory(),
			Self::BoundedOrder(chain) => chain.memory(),
		}
	}

	/// Capacity of the memory window.
	pub fn memory_size(&self) -> usize {
		match self {
			Self::Memoryless(chain) => chain.memory_size(),
			Self::BoundedOrder(chain) => chain.memory_size(),
		}
	}

	/// Number of previous states remembered (0 for a memoryless chain).
	pub fn order(&self) -> usize {
		match self {
			Self::Memoryless(_) => 0,
			Self::BoundedOrder(chain) => chain.order(),
		}
	}

	pub fn is_ready(&self) -> bool {
		match self {
			Self::Memoryless(chain) => chain.is_ready(),
			Self::BoundedOrder(chain) => chain.is_ready(),
		}
	}

	pub fn table(&self) -> &TransitionTable {
		match self {
			Self::Memoryless(chain) => chain.table(),
			Self::BoundedOrder(chain) => chain.table(),
		}
	}
}
