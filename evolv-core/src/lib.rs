//! Markov chain library predicting sequence continuations.
//!
//! This crate provides:
//! - A growable Fenwick tree for online counting and weighted sampling
//! - Memoryless and bounded-order chains working on dense integer codes
//! - A state coder and a high-level chain over any hashable state type
//! - Helpers to read training corpora from disk
//!
//! Randomness is always injected: every chain takes a seed or a generator,
//! so tests can fix outcomes.

/// Chain models, their building blocks, and the high-level interface.
pub mod model;

/// Errors shared by every chain operation.
pub mod error;

/// I/O utilities (corpus loading, path helpers).
pub mod io;
