//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `BIGRAM_GEN_CHUNK_SIZE`).
pub(crate) const ENV_PREFIX: &str = "BIGRAM_GEN_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_DATA_DIR: &str = "DATA_DIR";
pub(crate) const ENV_DEFAULT_FILE: &str = "DEFAULT_FILE";
pub(crate) const ENV_CHUNK_SIZE: &str = "CHUNK_SIZE";
pub(crate) const ENV_MAX_STEPS: &str = "MAX_STEPS";
pub(crate) const ENV_RNG_SEED: &str = "RNG_SEED";
pub(crate) const ENV_FALLBACK: &str = "FALLBACK";
pub(crate) const ENV_PREVIEW_WORDS: &str = "PREVIEW_WORDS";
pub(crate) const ENV_SEPARATOR: &str = "SEPARATOR";
pub(crate) const ENV_HOST: &str = "HOST";
pub(crate) const ENV_PORT: &str = "PORT";

// --- Default values ---

pub(crate) const DEFAULT_DATA_DIR: &str = "./training_data";
pub(crate) const DEFAULT_DEFAULT_FILE: &str = "maned_wolf_description.txt";
pub(crate) const DEFAULT_MAX_STEPS: usize = 100;
/// Largest number of tokens generated by a single request.
pub const MAX_STEPS_LIMIT: usize = 100_000;
pub(crate) const DEFAULT_PREVIEW_WORDS: usize = 25;
pub(crate) const DEFAULT_SEPARATOR: &str = " ";
pub(crate) const DEFAULT_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 5000;
