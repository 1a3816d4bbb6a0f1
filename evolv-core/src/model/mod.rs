//! Markov chain engine.
//!
//! Leaves first:
//! - Growable weighted index used for counting and sampling (`WeightedIndex`)
//! - Transition counts per source and depth (`TransitionTable`)
//! - Bounded memory window (`MemoryWindow`)
//! - Memoryless and bounded-order chains over codes (`ChainModel`)
//! - State coding and the high-level chain over arbitrary states (`MarkovChain`)

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Dense non-negative integer identifying a state.
///
/// Codes are handed out by a [`state_coder::Coder`] in order of first
/// appearance and double as positions in the weighted indexes.
pub type Code = usize;

/// Prefix-sum structure with O(log n) counting and weighted sampling.
pub mod weighted_index;

/// Transition counts keyed by `(source, depth)`.
pub mod transition_table;

/// Most-recent-first window of visited codes.
pub mod memory;

/// Chain that only conditions on its current state.
pub mod memoryless;

/// Chain that also conditions on a bounded number of previous states.
pub mod bounded;

/// Tagged union over both chain kinds.
pub mod chain;

/// Chain construction parameters.
pub mod config;

/// Mapping between caller states and codes.
pub mod state_coder;

/// High-level chain working on caller states.
pub mod markov_chain;

/// Seeds a generator, from the OS entropy source when `seed` is `None`.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
	match seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	}
}
