use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::{env, fmt};

use thiserror::Error;

/// Errors raised while loading training text.
#[derive(Debug, Error)]
pub enum SourceError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("default training file {0} is missing")]
	DefaultMissing(PathBuf),
}

/// Why a given file was loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextOrigin {
	/// The requested file exists and was loaded.
	Requested,
	/// The requested file does not exist; the default file was loaded.
	NotFound,
	/// No file name was given; the default file was loaded.
	NoInput,
}

impl fmt::Display for TextOrigin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TextOrigin::Requested => "requested file",
			TextOrigin::NotFound => "requested file not found, default file",
			TextOrigin::NoInput => "no file requested, default file",
		})
	}
}

/// Training text together with where it came from.
#[derive(Clone, Debug)]
pub struct LoadedText {
	pub path: PathBuf,
	pub origin: TextOrigin,
	pub text: String,
}

/// Supplies training text from a data directory, falling back to a default file.
///
/// # Behavior
/// - A non-blank file name is looked up inside `data_dir`.
/// - A blank name, or a name that is not an existing file, loads `default_file`.
#[derive(Clone, Debug)]
pub struct TextSource {
	data_dir: PathBuf,
	default_file: String,
}

impl TextSource {
	/// Creates a text source. `"."` and `"./"` resolve to the current directory.
	pub fn new<P: AsRef<Path>>(data_dir: P, default_file: &str) -> Self {
		Self {
			data_dir: normalize_folder(data_dir),
			default_file: default_file.to_owned(),
		}
	}

	pub fn data_dir(&self) -> &Path {
		&self.data_dir
	}

	pub fn default_path(&self) -> PathBuf {
		self.data_dir.join(&self.default_file)
	}

	/// Loads the requested file, or the default one.
	///
	/// # Errors
	/// - [`SourceError::DefaultMissing`] if the default file is needed and absent.
	/// - [`SourceError::Io`] if the chosen file cannot be read as UTF-8 text.
	pub fn load(&self, filename: Option<&str>) -> Result<LoadedText, SourceError> {
		let requested = filename.map(str::trim).filter(|name| !name.is_empty());

		let (path, origin) = match requested {
			Some(name) => {
				let path = self.data_dir.join(name);
				if path.is_file() {
					(path, TextOrigin::Requested)
				} else {
					(self.default_path(), TextOrigin::NotFound)
				}
			}
			None => (self.default_path(), TextOrigin::NoInput),
		};

		if origin != TextOrigin::Requested && !path.is_file() {
			return Err(SourceError::DefaultMissing(path));
		}

		let text = read_text(&path)?;
		Ok(LoadedText { path, origin, text })
	}
}

/// Reads a whole text file.
pub fn read_text<P: AsRef<Path>>(filename: P) -> Result<String, SourceError> {
	let path = filename.as_ref();
	fs::read_to_string(path).map_err(|source| SourceError::Io { path: path.to_owned(), source })
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./training_data/wolf.txt"` → `"wolf"`
/// - `"wolf.txt"` → `"wolf"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// First `n` whitespace-separated words of `text`, joined by single spaces.
pub fn preview_words(text: &str, n: usize) -> String {
	text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// Reduces a prompt line to the seed token: its last whitespace-separated word.
///
/// Returns `None` for a blank line.
pub fn seed_from_prompt(line: &str) -> Option<&str> {
	line.split_whitespace().next_back()
}
