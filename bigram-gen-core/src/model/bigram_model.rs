use std::collections::HashMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::error::ModelError;
use super::state::State;
use super::tokenizer::tokenize;

/// First-order Markov chain over tokens.
///
/// The `BigramModel` maps every predecessor token to the probability
/// distribution of the token observed right after it.
///
/// # Responsibilities
/// - Count adjacent token pairs from a token sequence
/// - Normalize counts into per-predecessor probabilities
/// - Expose the distributions read-only for generation and display
///
/// # Invariants
/// - A predecessor is present only if it was followed by at least one token
/// - For every predecessor, successor probabilities sum to 1.0 (within rounding)
/// - Predecessors and successors keep first-observation order
/// - The model is never modified after it has been built
#[derive(Clone, Debug, Default)]
pub struct BigramModel {
	/// One state per predecessor, in first-observation order.
	states: Vec<State>,
	/// Position of each predecessor in `states`.
	index: HashMap<String, usize>,
}

impl BigramModel {
	/// Builds a model from an ordered token sequence.
	///
	/// Every adjacent pair `(tokens[i], tokens[i + 1])` is counted once, then
	/// each predecessor's counts are divided by their total.
	///
	/// Fewer than two tokens give an empty model.
	pub fn build<S: AsRef<str>>(tokens: &[S]) -> Self {
		let mut model = Self::default();

		for pair in tokens.windows(2) {
			let (predecessor, successor) = (pair[0].as_ref(), pair[1].as_ref());
			let i = match model.index.get(predecessor) {
				Some(&i) => i,
				None => {
					model.index.insert(predecessor.to_owned(), model.states.len());
					model.states.push(State::new(predecessor));
					model.states.len() - 1
				}
			};
			model.states[i].add_transition(successor);
		}

		for state in &mut model.states {
			state.normalize();
		}

		model
	}

	/// Tokenizes `text` with the given chunk size and builds the model.
	///
	/// # Errors
	/// Returns [`ModelError::InvalidChunkSize`] if `chunk_size` is 0.
	pub fn from_text(text: &str, chunk_size: usize) -> Result<Self, ModelError> {
		Ok(Self::build(&tokenize(text, chunk_size)?))
	}

	/// Number of predecessor tokens.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Returns `true` if `token` was observed followed by another token.
	pub fn contains(&self, token: &str) -> bool {
		self.index.contains_key(token)
	}

	/// Predecessor tokens in first-observation order.
	pub fn predecessors(&self) -> impl Iterator<Item = &str> {
		self.states.iter().map(State::key)
	}

	/// `(successor, probability)` pairs of a predecessor, or `None` if unknown.
	pub fn successors<'a>(
		&'a self,
		token: &str,
	) -> Option<impl Iterator<Item = (&'a str, f64)> + use<'a>> {
		self.state(token)
			.map(|state| state.successors().iter().map(|s| (s.token(), s.probability())))
	}

	/// Probability of observing `successor` right after `predecessor`.
	pub fn probability(&self, predecessor: &str, successor: &str) -> Option<f64> {
		self.state(predecessor)?.successor(successor).map(|s| s.probability())
	}

	/// Number of transitions observed from `token`.
	pub fn observations(&self, token: &str) -> Option<usize> {
		self.state(token).map(State::total)
	}

	/// Iterates over every predecessor with its distribution.
	pub fn iter(&self) -> impl Iterator<Item = (&str, impl Iterator<Item = (&str, f64)>)> {
		self.states.iter().map(|state| {
			(state.key(), state.successors().iter().map(|s| (s.token(), s.probability())))
		})
	}

	pub(crate) fn state(&self, token: &str) -> Option<&State> {
		self.index.get(token).map(|&i| &self.states[i])
	}

	pub(crate) fn states(&self) -> &[State] {
		&self.states
	}
}

/// Builds a [`BigramModel`] from an ordered token sequence.
pub fn build_model<S: AsRef<str>>(tokens: &[S]) -> BigramModel {
	BigramModel::build(tokens)
}

/// Renders one block per predecessor:
///
/// ```text
/// "ab":
/// 	"cd": 0.5
/// 	"ef": 0.5
/// ```
///
/// Tokens are written as is (a newline token breaks the line) and
/// probabilities always carry a fractional part (`1.0`, not `1`).
impl fmt::Display for BigramModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for state in &self.states {
			writeln!(f, "\"{}\":", state.key())?;
			for successor in state.successors() {
				writeln!(f, "\t\"{}\": {:?}", successor.token(), successor.probability())?;
			}
		}
		Ok(())
	}
}

/// Serializes as `{ predecessor: { successor: probability } }`, keeping
/// first-observation order.
impl Serialize for BigramModel {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.states.len()))?;
		for state in &self.states {
			map.serialize_entry(state.key(), &Distribution(state))?;
		}
		map.end()
	}
}

struct Distribution<'a>(&'a State);

impl Serialize for Distribution<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self.0.successors().iter().map(|s| (s.token(), s.probability())))
	}
}
