use thiserror::Error;

use crate::model::Code;

/// Errors raised by the chain engine and its state coder.
///
/// All of them are reported synchronously and none is retried internally.
/// An operation that fails leaves every structure it touches unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
	/// A caller supplied a value outside the accepted domain
	/// (negative count delta, bounded chain with order 0, ...).
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// `predict` was called before any memory was established.
	#[error("Chain memory is empty, feed a sequence or set the memory first")]
	UninitializedState,

	/// The current memory has no recorded outgoing transitions.
	#[error("No transitions were observed from the current memory")]
	NoObservedTransitions,

	/// Sampling was requested outside `[0, total)` or on an empty index.
	#[error("Precondition violated: {0}")]
	PreconditionViolated(String),

	/// A code that the state coder never produced.
	#[error("Code {0} was never produced by the state coder")]
	IndexOutOfRange(Code),
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, ChainError>;
