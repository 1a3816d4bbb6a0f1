use std::borrow::Borrow;
use std::hash::Hash;
use std::marker::PhantomData;

use log::debug;
use rand::Rng;
use rand::rngs::StdRng;

use super::chain::ChainModel;
use super::config::ChainConfig;
use super::state_coder::{Coder, StateCoder};
use crate::error::{ChainError, Result};

/// Markov chain over arbitrary hashable states.
///
/// Wraps a [`ChainModel`] working on codes and a [`Coder`] translating
/// caller states to codes and back. By definition a Markov chain only
/// knows its current state; with `memory > 0` the chain also remembers
/// that many previous states and conditions its predictions on them.
///
/// # Responsibilities
/// - Encode training sequences and feed them to the chain
/// - Decode predictions and memory back into states
/// - Generate whole continuations by walking the chain
///
/// # Example
/// ```
/// use evolv_core::model::markov_chain::MarkovChain;
///
/// let mut chain: MarkovChain<&str> = MarkovChain::with_seed(0, 7).unwrap();
/// chain.feed_sequence(["a", "b", "c", "a", "b", "c"], true).unwrap();
/// assert_eq!(chain.predict_state(true).unwrap(), "a");
/// assert_eq!(chain.generate(3).unwrap(), vec!["b", "c", "a"]);
/// ```
#[derive(Clone, Debug)]
pub struct MarkovChain<S, C = StateCoder<S>, R = StdRng> {
	chain: ChainModel<R>,
	coder: C,
	states: PhantomData<S>,
}

impl<S: Eq + Hash + Clone> MarkovChain<S> {
	/// Creates a chain remembering `memory` previous states, seeded from the
	/// OS entropy source (predictions are not reproducible).
	pub fn new(memory: usize) -> Result<Self> {
		Self::from_config(&ChainConfig::new(memory))
	}

	/// Creates a reproducible chain remembering `memory` previous states.
	pub fn with_seed(memory: usize, seed: u64) -> Result<Self> {
		Self::from_config(&ChainConfig::new(memory).with_seed(seed))
	}

	pub fn from_config(config: &ChainConfig) -> Result<Self> {
		Ok(Self::with_parts(ChainModel::from_config(config)?, StateCoder::new()))
	}
}

impl<S, C: Coder<S>, R: Rng> MarkovChain<S, C, R> {
	/// Assembles a chain from an existing code chain and coder.
	///
	/// The coder must be the one that produced every code already known
	/// to `chain`, otherwise decoding fails with `IndexOutOfRange`.
	pub fn with_parts(chain: ChainModel<R>, coder: C) -> Self {
		Self { chain, coder, states: PhantomData }
	}

	/// Learns from a sequence of states.
	///
	/// Moves to the end of the sequence when `update_memory` is set or when
	/// the chain has no memory yet.
	pub fn feed_sequence<I>(&mut self, states: I, update_memory: bool) -> Result<()>
	where
		I: IntoIterator,
		I::Item: Borrow<S>,
	{
		let coder = &mut self.coder;
		self.chain.ingest(states.into_iter().map(|state| coder.encode(state.borrow())), update_memory)?;
		debug!("Chain knows {} states", self.coder.len());
		Ok(())
	}

	/// Predicts the state following the current memory and moves to it if
	/// `update_memory` is set.
	///
	/// # Errors
	/// - `UninitializedState` before the first sequence or memory update.
	/// - `NoObservedTransitions` if the current memory was never followed by anything.
	pub fn predict_state(&mut self, update_memory: bool) -> Result<S> {
		let code = self.chain.predict(update_memory)?;
		self.coder.decode(code)
	}

	/// Walks the chain for up to `len` steps and returns the visited states.
	///
	/// The walk stops early when it reaches a memory that was never followed
	/// by anything during training, like a sentence reaching its end.
	///
	/// # Errors
	/// `UninitializedState` if the chain has no memory.
	pub fn generate(&mut self, len: usize) -> Result<Vec<S>> {
		let mut sequence = Vec::new();
		for _ in 0..len {
			match self.predict_state(true) {
				Ok(state) => sequence.push(state),
				Err(ChainError::NoObservedTransitions) => break,
				Err(e) => return Err(e),
			}
		}
		Ok(sequence)
	}

	/// Moves to `state`, forgetting the oldest remembered one if full.
	pub fn update_memory(&mut self, state: &S) {
		let code = self.coder.encode(state);
		self.chain.update_memory(code);
	}

	/// Walks through `states`, given oldest first.
	pub fn update_memory_many<I>(&mut self, states: I)
	where
		I: IntoIterator,
		I::Item: Borrow<S>,
	{
		let coder = &mut self.coder;
		self.chain.update_memory_many(states.into_iter().map(|state| coder.encode(state.borrow())));
	}

	/// Forgets the memory and replaces it with `states`, given oldest first.
	pub fn set_memory<I>(&mut self, states: I)
	where
		I: IntoIterator,
		I::Item: Borrow<S>,
	{
		let coder = &mut self.coder;
		self.chain.set_memory(states.into_iter().map(|state| coder.encode(state.borrow())));
	}

	/// Memory, latest state first.
	pub fn memory(&self) -> Result<Vec<S>> {
		self.chain.memory().into_iter().map(|code| self.coder.decode(code)).collect()
	}

	/// Capacity of the memory window (`memory + 1`).
	pub fn memory_size(&self) -> usize {
		self.chain.memory_size()
	}

	/// Number of previous states remembered besides the current one.
	pub fn order(&self) -> usize {
		self.chain.order()
	}

	pub fn is_ready(&self) -> bool {
		self.chain.is_ready()
	}

	/// Number of distinct states seen so far.
	pub fn state_count(&self) -> usize {
		self.coder.len()
	}

	pub fn chain(&self) -> &ChainModel<R> {
		&self.chain
	}

	pub fn coder(&self) -> &C {
		&self.coder
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SEED: u64 = 2024;

	#[test]
	fn memory_is_decoded() {
		let mut chain: MarkovChain<i32> = MarkovChain::with_seed(0, SEED).unwrap();
		assert_eq!(chain.memory(), Ok(vec![]));

		chain.update_memory(&13);
		assert_eq!(chain.memory(), Ok(vec![13]));

		chain.update_memory_many([3, 5, 7]);
		assert_eq!(chain.memory(), Ok(vec![7]));

		chain.feed_sequence([1, 2, 1, 2, 1, 2, 1], true).unwrap();
		assert_eq!(chain.memory(), Ok(vec![1]));
	}

	#[test]
	fn alternating_states() {
		let seq = vec![1, 2, 1, 2, 1, 2, 1];
		let mut chain: MarkovChain<i32> = MarkovChain::with_seed(0, SEED).unwrap();
		chain.feed_sequence(&seq, true).unwrap();
		assert_eq!(chain.predict_state(false), Ok(2));
		assert_eq!(chain.predict_state(true), Ok(2));
		assert_eq!(chain.predict_state(true), Ok(1));
		assert_eq!(chain.state_count(), 2);
	}

	#[test]
	fn cycling_states() {
		let mut chain: MarkovChain<i32> = MarkovChain::with_seed(0, SEED).unwrap();
		chain.feed_sequence([1, 2, 3, 1, 2, 3, 1, 2, 3], true).unwrap();
		assert_eq!(chain.predict_state(false), Ok(1));
		assert_eq!(chain.predict_state(true), Ok(1));
		assert_eq!(chain.predict_state(true), Ok(2));
		assert_eq!(chain.predict_state(true), Ok(3));
		assert_eq!(chain.predict_state(true), Ok(1));
		assert_eq!(chain.memory(), Ok(vec![1]));
	}

	#[test]
	fn generate_stops_at_a_dead_end() {
		let mut chain: MarkovChain<char> = MarkovChain::with_seed(1, SEED).unwrap();
		chain.feed_sequence("abcd".chars(), false).unwrap();
		chain.set_memory(['a']);
		assert_eq!(chain.generate(10), Ok(vec!['b', 'c', 'd']));
		assert_eq!(chain.memory(), Ok(vec!['d', 'c']));
	}

	#[test]
	fn generate_any_length_at_a_dead_end() {
		let mut chain: MarkovChain<String> = MarkovChain::with_seed(0, SEED).unwrap();
		chain.feed_sequence(["a".to_owned(), "b".to_owned()], true).unwrap();
		assert_eq!(chain.generate(usize::MAX), Ok(vec![]));
		assert_eq!(chain.memory(), Ok(vec!["b".to_owned()]));
	}

	#[test]
	fn generate_needs_memory() {
		let mut chain: MarkovChain<char> = MarkovChain::with_seed(2, SEED).unwrap();
		assert_eq!(chain.generate(3), Err(ChainError::UninitializedState));
	}

	#[test]
	fn mismatched_coder_surfaces_index_errors() {
		let mut codes = ChainModel::new(0, Some(SEED)).unwrap();
		codes.ingest([0, 5, 0, 5], true).unwrap();
		let mut chain: MarkovChain<&str> = MarkovChain::with_parts(codes, StateCoder::new());
		assert_eq!(chain.predict_state(false), Err(ChainError::IndexOutOfRange(0)));
		assert_eq!(chain.memory(), Err(ChainError::IndexOutOfRange(5)));
	}
}
