//! Bigram-based text generation library.
//!
//! This crate provides a token-level Markov chain generator including:
//! - Fixed-width chunk tokenization that keeps every whitespace character
//! - Bigram counting normalized into per-token probability distributions
//! - Weighted random generation with an injected random source
//! - Text and prompt sources, and environment-driven configuration
//!
//! The model layer never performs I/O and never logs: it returns data and
//! typed errors, and reports fallbacks as structured events.

/// Core bigram model and generation logic.
pub mod model;

/// I/O utilities (training text loading, file listing, prompt helpers).
pub mod io;

/// Configuration read from `BIGRAM_GEN_*` environment variables.
pub mod config;
