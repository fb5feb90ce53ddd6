use thiserror::Error;

/// Errors produced when building or validating configuration.
///
/// # Variants
///
/// - **Validation**: a value is out of range (e.g. `chunk_size` of 0).
/// - **EnvVar**: a variable is set but cannot be read (e.g. not Unicode).
/// - **Parse**: a variable is set but does not parse into the expected type
///   (e.g. `BIGRAM_GEN_MAX_STEPS=many`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
	#[error("config validation: {0}")]
	Validation(String),

	#[error("env var {key}: {message}")]
	EnvVar { key: String, message: String },

	#[error("env var {key}={value:?}: {message}")]
	Parse { key: String, value: String, message: String },
}
