use serde::Deserialize;

/// Construction parameters of a chain.
///
/// # Fields
/// - `memory`: number of previous states remembered besides the current
///   one. `0` builds a memoryless chain, `N >= 1` a chain of order `N`
///   whose memory window holds `N + 1` states.
/// - `seed`: seed of the random generator. `None` seeds from the OS
///   entropy source, so predictions are not reproducible.
///
/// Missing fields deserialize to their defaults (memoryless, unseeded), so
/// a config can be read straight from a query string.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ChainConfig {
	pub memory: usize,
	pub seed: Option<u64>,
}

impl ChainConfig {
	/// Unseeded configuration remembering `memory` previous states.
	pub fn new(memory: usize) -> Self {
		Self { memory, seed: None }
	}

	/// Same configuration with a fixed seed.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	pub fn is_memoryless(&self) -> bool {
		self.memory == 0
	}

	/// Capacity of the memory window the chain will use.
	pub fn window_size(&self) -> usize {
		self.memory + 1
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_memoryless_and_unseeded() {
		let config = ChainConfig::default();
		assert!(config.is_memoryless());
		assert_eq!(config.seed, None);
		assert_eq!(config.window_size(), 1);
	}

	#[test]
	fn builder() {
		let config = ChainConfig::new(2).with_seed(11);
		assert!(!config.is_memoryless());
		assert_eq!(config.seed, Some(11));
		assert_eq!(config.window_size(), 3);
	}
}
