use std::collections::VecDeque;

use super::Code;

/// Bounded window of the most recently visited codes.
///
/// The front is the latest code. Pushing into a full window forgets the
/// oldest one, so the window never holds more than `capacity` codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryWindow {
	capacity: usize,
	codes: VecDeque<Code>,
}

impl MemoryWindow {
	/// `capacity` is clamped to at least 1.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self { capacity, codes: VecDeque::with_capacity(capacity) }
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.codes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.codes.is_empty()
	}

	/// Latest code, if any.
	pub fn front(&self) -> Option<Code> {
		self.codes.front().copied()
	}

	/// Pushes `code` as the latest one.
	pub fn push(&mut self, code: Code) {
		if self.codes.len() >= self.capacity {
			self.codes.pop_back();
		}
		self.codes.push_front(code);
	}

	/// Pushes `codes` in chronological order (oldest first).
	pub fn extend<I: IntoIterator<Item = Code>>(&mut self, codes: I) {
		for code in codes {
			self.push(code);
		}
	}

	/// Forgets everything, then pushes `codes` oldest first.
	pub fn replace<I: IntoIterator<Item = Code>>(&mut self, codes: I) {
		self.codes.clear();
		self.extend(codes);
	}

	/// Codes from the latest to the oldest, as one slice.
	pub fn make_contiguous(&mut self) -> &[Code] {
		self.codes.make_contiguous()
	}

	/// Owned copy, latest first.
	pub fn to_vec(&self) -> Vec<Code> {
		self.codes.iter().copied().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_latest_first_and_forgets_oldest() {
		let mut window = MemoryWindow::new(3);
		window.extend([0, 3, 2]);
		assert_eq!(window.to_vec(), vec![2, 3, 0]);

		window.extend([4, 5]);
		assert_eq!(window.to_vec(), vec![5, 4, 2]);

		window.push(1);
		assert_eq!(window.to_vec(), vec![1, 5, 4]);
		assert_eq!(window.front(), Some(1));
	}

	#[test]
	fn replace_clears_first() {
		let mut window = MemoryWindow::new(3);
		window.extend([7, 8, 9]);
		window.replace([1]);
		assert_eq!(window.to_vec(), vec![1]);
	}

	#[test]
	fn capacity_is_never_zero() {
		let mut window = MemoryWindow::new(0);
		window.extend([3, 5, 7]);
		assert_eq!(window.capacity(), 1);
		assert_eq!(window.to_vec(), vec![7]);
	}
}
