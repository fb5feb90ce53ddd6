//! Configuration shared by the command line and HTTP front ends.
//!
//! Load from environment via [`from_env`] and validate with [`Config::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use std::path::PathBuf;

use constants::{
	DEFAULT_DATA_DIR, DEFAULT_DEFAULT_FILE, DEFAULT_HOST, DEFAULT_MAX_STEPS, DEFAULT_PORT,
	DEFAULT_PREVIEW_WORDS, DEFAULT_SEPARATOR,
};

use crate::io::TextSource;
use crate::model::{DEFAULT_CHUNK_SIZE, FallbackPolicy};

pub use builder::{env_key, from_env, from_lookup};
pub use constants::MAX_STEPS_LIMIT;
pub use error::ConfigError;

/// Central configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	/// Directory holding training text files.
	pub data_dir: PathBuf,
	/// File loaded when none is requested or the requested one is missing.
	pub default_file: String,
	/// Maximum characters per non-whitespace token.
	pub chunk_size: usize,
	/// Tokens generated after the seed.
	pub max_steps: usize,
	/// Seed of the random source; `None` draws one from the OS.
	pub rng_seed: Option<u64>,
	pub fallback: FallbackPolicy,
	/// Words of training text shown before building.
	pub preview_words: usize,
	/// String placed between generated tokens when rendering.
	pub separator: String,
	pub host: String,
	pub port: u16,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			data_dir: PathBuf::from(DEFAULT_DATA_DIR),
			default_file: DEFAULT_DEFAULT_FILE.to_owned(),
			chunk_size: DEFAULT_CHUNK_SIZE,
			max_steps: DEFAULT_MAX_STEPS,
			rng_seed: None,
			fallback: FallbackPolicy::default(),
			preview_words: DEFAULT_PREVIEW_WORDS,
			separator: DEFAULT_SEPARATOR.to_owned(),
			host: DEFAULT_HOST.to_owned(),
			port: DEFAULT_PORT,
		}
	}
}

impl Config {
	/// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.chunk_size == 0 {
			return Err(ConfigError::Validation("chunk_size must be greater than 0".to_owned()));
		}
		if self.max_steps > MAX_STEPS_LIMIT {
			return Err(ConfigError::Validation(format!(
				"max_steps must be at most {MAX_STEPS_LIMIT}"
			)));
		}
		if self.default_file.trim().is_empty() {
			return Err(ConfigError::Validation("default_file must not be empty".to_owned()));
		}
		if self.port == 0 {
			return Err(ConfigError::Validation("port must be greater than 0".to_owned()));
		}
		Ok(())
	}

	/// Text source reading from `data_dir` with `default_file` as fallback.
	pub fn text_source(&self) -> TextSource {
		TextSource::new(&self.data_dir, &self.default_file)
	}
}
