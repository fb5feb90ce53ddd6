//! Top-level module for the bigram generation system.
//!
//! This module provides a token-level Markov chain text generator, including:
//! - Fixed-width chunk tokenization (`tokenizer`)
//! - Bigram counting and normalization (`BigramModel`)
//! - Internal per-predecessor state management (`State`)
//! - Weighted random generation with a fallback policy (`Generator`)
//! - Structured diagnostics raised while generating (`DiagnosticEvent`)

/// Splits raw text into fixed-size character chunks and single whitespace characters.
pub mod tokenizer;

/// Bigram model built once from a token sequence, read-only afterwards.
pub mod bigram_model;

/// Weighted random walk over a `BigramModel`.
///
/// The random source and the diagnostics sink are passed in by the caller.
pub mod generator;

/// Events reported while generating, and the sink trait receiving them.
pub mod diagnostics;

/// Errors of the tokenizer, builder and generator.
pub mod error;

/// Internal representation of a single predecessor and its transitions.
///
/// This module is not exposed publicly.
mod state;

pub use bigram_model::{BigramModel, build_model};
pub use diagnostics::{DiagnosticEvent, DiagnosticsSink, Discard};
pub use error::ModelError;
pub use generator::{FallbackPolicy, Generator, generate};
pub use tokenizer::{DEFAULT_CHUNK_SIZE, tokenize};
