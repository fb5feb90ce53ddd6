use thiserror::Error;

/// Errors produced by the tokenizer, the model builder and the generator.
///
/// A fallback during generation is not an error; it is reported through
/// [`DiagnosticsSink`](super::diagnostics::DiagnosticsSink) instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
	/// The tokenizer was asked for chunks of zero characters.
	#[error("chunk size must be >= 1")]
	InvalidChunkSize,

	/// Generation was requested against a model without any predecessor.
	#[error("model is empty, no token to generate from")]
	EmptyModel,

	/// The seed token is empty.
	#[error("seed token must not be empty")]
	InvalidSeed,
}
