use std::collections::HashMap;
use std::hash::Hash;

use super::Code;
use crate::error::{ChainError, Result};

/// Bijection between caller states and the dense codes chains work on.
///
/// Implementations must hand out codes densely (`0, 1, 2, ...`): the bounded
/// chain searches the whole code range up to the largest code it has seen.
pub trait Coder<S> {
	/// Returns the code of `state`, registering it if it is new.
	fn encode(&mut self, state: &S) -> Code;

	/// Returns the state behind `code`.
	///
	/// # Errors
	/// `IndexOutOfRange` if `code` was never produced by `encode`.
	fn decode(&self, code: Code) -> Result<S>;

	/// Number of registered states.
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Default coder: codes are assigned in order of first appearance.
///
/// ## Invariants
/// - `decoder[encoder[s]] == s` for every registered state
/// - codes are exactly `0..decoder.len()`
#[derive(Clone, Debug)]
pub struct StateCoder<S> {
	encoder: HashMap<S, Code>,
	decoder: Vec<S>,
}

impl<S> Default for StateCoder<S> {
	fn default() -> Self {
		Self { encoder: HashMap::new(), decoder: Vec::new() }
	}
}

impl<S: Eq + Hash + Clone> StateCoder<S> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Code of an already registered state.
	pub fn code_of(&self, state: &S) -> Option<Code> {
		self.encoder.get(state).copied()
	}

	/// Registered states, indexed by code.
	pub fn states(&self) -> &[S] {
		&self.decoder
	}
}

impl<S: Eq + Hash + Clone> Coder<S> for StateCoder<S> {
	fn encode(&mut self, state: &S) -> Code {
		if let Some(&code) = self.encoder.get(state) {
			return code;
		}
		let code = self.decoder.len();
		self.decoder.push(state.clone());
		self.encoder.insert(state.clone(), code);
		code
	}

	fn decode(&self, code: Code) -> Result<S> {
		self.decoder.get(code).cloned().ok_or(ChainError::IndexOutOfRange(code))
	}

	fn len(&self) -> usize {
		self.decoder.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn codes_follow_first_appearance() {
		let mut coder = StateCoder::new();
		for state in [1, 2, 3, 1, 2, 3, 1, 2, 3] {
			coder.encode(&state);
		}
		assert_eq!(coder.encode(&1), 0);
		assert_eq!(coder.encode(&2), 1);
		assert_eq!(coder.encode(&3), 2);
		assert_eq!(coder.decode(0), Ok(1));
		assert_eq!(coder.decode(1), Ok(2));
		assert_eq!(coder.decode(2), Ok(3));
		assert_eq!(coder.len(), 3);
	}

	#[test]
	fn later_states_get_later_codes() {
		let mut coder = StateCoder::new();
		coder.encode(&"b".to_owned());
		coder.encode(&"a".to_owned());
		assert_eq!(coder.code_of(&"a".to_owned()), Some(1));
		assert_eq!(coder.code_of(&"c".to_owned()), None);
		assert_eq!(coder.encode(&"c".to_owned()), 2);
		assert_eq!(coder.states(), ["b", "a", "c"]);
	}

	#[test]
	fn unknown_code() {
		let coder: StateCoder<char> = StateCoder::new();
		assert!(coder.is_empty());
		assert_eq!(coder.decode(0), Err(ChainError::IndexOutOfRange(0)));
	}
}
