//! Build [`Config`] from environment variables.
//!
//! Every reader takes a lookup function so that tests can supply variables
//! without touching the process environment; [`from_env`] plugs in `std::env::var`.

use std::env::VarError;
use std::path::PathBuf;
use std::str::FromStr;

use super::constants::{
	ENV_CHUNK_SIZE, ENV_DATA_DIR, ENV_DEFAULT_FILE, ENV_FALLBACK, ENV_HOST, ENV_MAX_STEPS,
	ENV_PORT, ENV_PREFIX, ENV_PREVIEW_WORDS, ENV_RNG_SEED, ENV_SEPARATOR,
};
use super::{Config, ConfigError};
use crate::model::FallbackPolicy;

/// Returns the full environment variable key for a suffix (`SEED` → `BIGRAM_GEN_SEED`).
pub fn env_key(suffix: &str) -> String {
	format!("{ENV_PREFIX}{suffix}")
}

fn lookup_string<F>(lookup: &F, suffix: &str) -> Result<Option<String>, ConfigError>
where
	F: Fn(&str) -> Result<String, VarError>,
{
	let key = env_key(suffix);
	match lookup(&key) {
		Ok(s) => Ok(Some(s)),
		Err(VarError::NotPresent) => Ok(None),
		Err(e) => Err(ConfigError::EnvVar { key, message: e.to_string() }),
	}
}

fn lookup_parsed<F, T>(lookup: &F, suffix: &str) -> Result<Option<T>, ConfigError>
where
	F: Fn(&str) -> Result<String, VarError>,
	T: FromStr,
	T::Err: std::fmt::Display,
{
	let Some(value) = lookup_string(lookup, suffix)? else {
		return Ok(None);
	};
	match value.trim().parse() {
		Ok(parsed) => Ok(Some(parsed)),
		Err(e) => Err(ConfigError::Parse { key: env_key(suffix), value, message: e.to_string() }),
	}
}

/// Builds [`Config`] from `lookup`, falling back to [`Config::default`] for unset keys.
///
/// # Errors
/// Returns [`ConfigError`] if any *set* variable cannot be read or parsed.
/// The result is not validated; call [`Config::validate`].
pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
	F: Fn(&str) -> Result<String, VarError>,
{
	let default = Config::default();

	Ok(Config {
		data_dir: lookup_string(&lookup, ENV_DATA_DIR)?
			.map(PathBuf::from)
			.unwrap_or(default.data_dir),
		default_file: lookup_string(&lookup, ENV_DEFAULT_FILE)?.unwrap_or(default.default_file),
		chunk_size: lookup_parsed(&lookup, ENV_CHUNK_SIZE)?.unwrap_or(default.chunk_size),
		max_steps: lookup_parsed(&lookup, ENV_MAX_STEPS)?.unwrap_or(default.max_steps),
		rng_seed: lookup_parsed(&lookup, ENV_RNG_SEED)?.or(default.rng_seed),
		fallback: lookup_parsed::<_, FallbackPolicy>(&lookup, ENV_FALLBACK)?
			.unwrap_or(default.fallback),
		preview_words: lookup_parsed(&lookup, ENV_PREVIEW_WORDS)?.unwrap_or(default.preview_words),
		separator: lookup_string(&lookup, ENV_SEPARATOR)?.unwrap_or(default.separator),
		host: lookup_string(&lookup, ENV_HOST)?.unwrap_or(default.host),
		port: lookup_parsed(&lookup, ENV_PORT)?.unwrap_or(default.port),
	})
}

/// Builds [`Config`] from the process environment.
pub fn from_env() -> Result<Config, ConfigError> {
	from_lookup(|key| std::env::var(key))
}
