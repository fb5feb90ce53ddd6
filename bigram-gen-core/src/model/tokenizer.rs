use super::error::ModelError;

/// Number of characters per chunk used when nothing else is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 2;

/// Splits `text` into fixed-size character chunks and single whitespace characters.
///
/// The scan keeps an accumulator of non-whitespace characters:
/// - a whitespace character flushes the accumulator (if not empty), then is
///   emitted alone as a one-character token
/// - a non-whitespace character is appended, and the accumulator is flushed
///   as soon as it holds `chunk_size` characters
/// - whatever remains at the end of input is flushed as a (possibly short) token
///
/// Word and punctuation boundaries are ignored on purpose: `"wolf."` with a
/// chunk size of 2 gives `["wo", "lf", "."]`.
///
/// Tokens borrow from `text`, are never empty, never overlap, and their
/// concatenation is exactly `text`.
///
/// # Notes
/// - UTF-8 safe: sizes are counted in characters, not bytes.
///
/// # Errors
/// Returns [`ModelError::InvalidChunkSize`] if `chunk_size` is 0.
pub fn tokenize(text: &str, chunk_size: usize) -> Result<Vec<&str>, ModelError> {
	if chunk_size == 0 {
		return Err(ModelError::InvalidChunkSize);
	}

	let mut tokens = Vec::new();
	// Byte offset where the current accumulator starts, and its length in chars
	let mut start: Option<usize> = None;
	let mut len = 0;

	for (i, c) in text.char_indices() {
		let end = i + c.len_utf8();
		if c.is_whitespace() {
			if let Some(s) = start.take() {
				tokens.push(&text[s..i]);
				len = 0;
			}
			tokens.push(&text[i..end]);
		} else {
			let s = *start.get_or_insert(i);
			len += 1;
			if len == chunk_size {
				tokens.push(&text[s..end]);
				start = None;
				len = 0;
			}
		}
	}

	if let Some(s) = start {
		tokens.push(&text[s..]);
	}

	Ok(tokens)
}
