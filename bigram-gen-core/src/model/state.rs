use std::collections::HashMap;

use rand::Rng;

/// A successor token observed after a given predecessor.
#[derive(Clone, Debug)]
pub(crate) struct Successor {
	token: String,
	/// Number of times the transition was observed.
	occurrences: usize,
	/// `occurrences / total`, filled in by [`State::normalize`].
	probability: f64,
}

impl Successor {
	pub fn token(&self) -> &str {
		&self.token
	}

	#[cfg(test)]
	pub fn occurrences(&self) -> usize {
		self.occurrences
	}

	pub fn probability(&self) -> f64 {
		self.probability
	}
}

/// Represents a predecessor token in a bigram model.
///
/// A `State` stores every transition observed from its `key` to the next
/// token, both as a raw occurrence count and as a probability.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their probability.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences while the model is built
/// - Turn occurrences into a probability distribution once counting is done
/// - Pick the next token by cumulative probability inversion
///
/// ## Invariants
/// - Successors keep the order in which they were first observed
/// - Each successor occurrence count is strictly positive
/// - After `normalize`, probabilities sum to 1.0 (within rounding)
#[derive(Clone, Debug)]
pub(crate) struct State {
	/// Identifier of the state (the predecessor token).
	key: String,
	/// Outgoing transitions, in first-observation order.
	successors: Vec<Successor>,
	/// Position of each successor token in `successors`.
	index: HashMap<String, usize>,
	/// Sum of all occurrences.
	total: usize,
}

impl State {
	/// Creates a new empty state for the given predecessor.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			successors: Vec::new(),
			index: HashMap::new(),
			total: 0,
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	/// Total number of transitions observed from this state.
	pub fn total(&self) -> usize {
		self.total
	}

	pub fn successors(&self) -> &[Successor] {
		&self.successors
	}

	pub fn successor(&self, token: &str) -> Option<&Successor> {
		self.index.get(token).map(|&i| &self.successors[i])
	}

	/// Records an occurrence of a transition toward `next`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is appended with a count of 1.
	pub fn add_transition(&mut self, next: &str) {
		match self.index.get(next) {
			Some(&i) => self.successors[i].occurrences += 1,
			None => {
				self.index.insert(next.to_owned(), self.successors.len());
				self.successors.push(Successor {
					token: next.to_owned(),
					occurrences: 1,
					probability: 0.0,
				});
			}
		}
		self.total += 1;
	}

	/// Converts occurrence counts into probabilities (`count / total`).
	pub fn normalize(&mut self) {
		if self.total == 0 {
			return;
		}
		let total = self.total as f64;
		for successor in &mut self.successors {
			successor.probability = successor.occurrences as f64 / total;
		}
	}

	/// Sum of the outgoing probabilities, added in successor order.
	pub fn probability_mass(&self) -> f64 {
		self.successors.iter().map(Successor::probability).sum()
	}

	/// Predicts the next token using weighted random sampling.
	///
	/// Draws `u` uniformly in `[0, 1)` and returns the first successor whose
	/// cumulative probability is greater than `u`. If rounding leaves `u` above
	/// the last cumulative value, the last successor is returned.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		let last = self.successors.last()?;

		let u: f64 = rng.random();
		let mut cumulative = 0.0;
		for successor in &self.successors {
			cumulative += successor.probability;
			if u < cumulative {
				return Some(&successor.token);
			}
		}

		Some(&last.token)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn state(key: &str, next: &[&str]) -> State {
		let mut state = State::new(key);
		for token in next {
			state.add_transition(token);
		}
		state.normalize();
		state
	}

	#[test]
	fn counts_and_keeps_first_observation_order() {
		let s = state("ab", &["cd", "ef", "cd"]);
		let tokens: Vec<_> = s.successors().iter().map(|x| (x.token(), x.occurrences())).collect();
		assert_eq!(tokens, vec![("cd", 2), ("ef", 1)]);
		assert_eq!(s.total(), 3);
	}

	#[test]
	fn normalize_gives_a_distribution() {
		let s = state("ab", &["cd", "ef", "cd", "gh"]);
		assert_eq!(s.successor("cd").unwrap().probability(), 0.5);
		assert_eq!(s.successor("ef").unwrap().probability(), 0.25);
		assert!((s.probability_mass() - 1.0).abs() < 1e-12);
	}

	#[test]
	fn predict_on_empty_state_is_none() {
		let s = State::new("ab");
		assert_eq!(s.predict(&mut StdRng::seed_from_u64(1)), None);
	}

	#[test]
	fn predict_follows_the_weights() {
		let s = state("a", &["b", "b", "b", "c"]);
		let mut rng = StdRng::seed_from_u64(7);
		let draws = 4000;
		let b = (0..draws).filter(|_| s.predict(&mut rng) == Some("b")).count();
		let ratio = b as f64 / draws as f64;
		assert!((ratio - 0.75).abs() < 0.05, "ratio = {ratio}");
	}
}
