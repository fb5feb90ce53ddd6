use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

use super::bigram_model::BigramModel;
use super::diagnostics::{DiagnosticEvent, DiagnosticsSink, Discard};
use super::error::ModelError;
use super::state::State;

/// Strategy used to pick a predecessor when the current token is unknown.
///
/// # Variants
/// - `MostFrequent`: the predecessor with the most observed outgoing
///   transitions (raw counts).
/// - `ProbabilityMass`: the predecessor with the largest sum of outgoing
///   probabilities. Since every distribution is normalized this is ~1.0 for
///   all of them, so the choice mostly falls on the first observed token.
///
/// In both cases ties go to the predecessor observed first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
	#[default]
	MostFrequent,
	ProbabilityMass,
}

impl FallbackPolicy {
	pub fn as_str(&self) -> &'static str {
		match self {
			FallbackPolicy::MostFrequent => "most_frequent",
			FallbackPolicy::ProbabilityMass => "probability_mass",
		}
	}

	/// Returns the fallback predecessor of `model`, or `None` if it is empty.
	fn choose<'m>(&self, model: &'m BigramModel) -> Option<&'m str> {
		let mut best: Option<&State> = None;
		for state in model.states() {
			let better = match best {
				None => true,
				Some(current) => match self {
					FallbackPolicy::MostFrequent => state.total() > current.total(),
					FallbackPolicy::ProbabilityMass => {
						state.probability_mass() > current.probability_mass()
					}
				},
			};
			if better {
				best = Some(state);
			}
		}
		best.map(State::key)
	}
}

impl fmt::Display for FallbackPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown fallback policy {0:?}, expected \"most_frequent\" or \"probability_mass\"")]
pub struct ParseFallbackPolicyError(String);

impl FromStr for FallbackPolicy {
	type Err = ParseFallbackPolicyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
			"most_frequent" => Ok(FallbackPolicy::MostFrequent),
			"probability_mass" => Ok(FallbackPolicy::ProbabilityMass),
			_ => Err(ParseFallbackPolicyError(s.to_owned())),
		}
	}
}

/// Upper bound on the output capacity reserved before walking.
const MAX_RESERVED_TOKENS: usize = 4096;

/// State of one generation call: the current token and everything emitted so far.
struct Walk<'s> {
	current: &'s str,
	emitted: Vec<&'s str>,
}

impl<'s> Walk<'s> {
	fn new(seed: &'s str, max_steps: usize) -> Self {
		// Grows past the reservation as tokens are emitted
		let mut emitted = Vec::with_capacity(max_steps.saturating_add(1).min(MAX_RESERVED_TOKENS));
		emitted.push(seed);
		Self { current: seed, emitted }
	}

	fn advance(&mut self, next: &'s str) {
		self.emitted.push(next);
		self.current = next;
	}
}

/// Weighted random walk over a [`BigramModel`].
///
/// # Responsibilities
/// - Sample each next token from the current token's distribution
/// - Fall back to a predecessor picked by [`FallbackPolicy`] when the current
///   token has no outgoing transition, and report it to a [`DiagnosticsSink`]
///
/// The random source is always passed in, so a seeded generator makes the
/// output reproducible.
#[derive(Clone, Copy, Debug)]
pub struct Generator<'m> {
	model: &'m BigramModel,
	fallback: FallbackPolicy,
}

impl<'m> Generator<'m> {
	/// Creates a generator using [`FallbackPolicy::MostFrequent`].
	pub fn new(model: &'m BigramModel) -> Self {
		Self { model, fallback: FallbackPolicy::default() }
	}

	pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
		self.fallback = fallback;
		self
	}

	pub fn fallback(&self) -> FallbackPolicy {
		self.fallback
	}

	/// Generates `max_steps` tokens after `seed`.
	///
	/// # Returns
	/// - `Ok(Vec<&str>)` starting with `seed`, always `max_steps + 1` long
	///
	/// # Behavior
	/// - If the current token is a predecessor, the next one is sampled from
	///   its distribution with a single uniform draw from `rng`.
	/// - Otherwise the fallback predecessor is used and a
	///   [`DiagnosticEvent::FallbackTriggered`] is sent to `sink`.
	///
	/// # Errors
	/// - [`ModelError::InvalidSeed`] if `seed` is empty.
	/// - [`ModelError::EmptyModel`] if the model has no predecessor, whatever
	///   `max_steps` is.
	pub fn generate<'s, R, D>(
		&self,
		seed: &'s str,
		max_steps: usize,
		rng: &mut R,
		sink: &mut D,
	) -> Result<Vec<&'s str>, ModelError>
	where
		'm: 's,
		R: Rng + ?Sized,
		D: DiagnosticsSink + ?Sized,
	{
		if seed.is_empty() {
			return Err(ModelError::InvalidSeed);
		}
		if self.model.is_empty() {
			return Err(ModelError::EmptyModel);
		}

		let model: &'m BigramModel = self.model;
		// Computed on first miss only
		let mut fallback_token: Option<&'m str> = None;
		let mut walk = Walk::new(seed, max_steps);

		for _ in 0..max_steps {
			let next = match model.state(walk.current).and_then(|state| state.predict(rng)) {
				Some(token) => token,
				None => {
					let chosen = match fallback_token {
						Some(token) => token,
						None => {
							let token = self.fallback.choose(model).ok_or(ModelError::EmptyModel)?;
							fallback_token = Some(token);
							token
						}
					};
					sink.record(DiagnosticEvent::FallbackTriggered {
						missing_token: walk.current.to_owned(),
						chosen_token: chosen.to_owned(),
					});
					chosen
				}
			};
			walk.advance(next);
		}

		Ok(walk.emitted)
	}
}

/// Generates `max_steps` tokens after `seed`, ignoring diagnostics.
///
/// Uses [`FallbackPolicy::MostFrequent`]; see [`Generator::generate`].
pub fn generate<'s, R: Rng + ?Sized>(
	model: &'s BigramModel,
	seed: &'s str,
	max_steps: usize,
	rng: &mut R,
) -> Result<Vec<&'s str>, ModelError> {
	Generator::new(model).generate(seed, max_steps, rng, &mut Discard)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::bigram_model::build_model;
	use pretty_assertions::assert_eq;
	use rand::rngs::StdRng;
	use rand::{RngCore, SeedableRng};

	/// Every uniform draw is 0.0: always the first listed successor.
	struct FirstRng;

	impl RngCore for FirstRng {
		fn next_u32(&mut self) -> u32 {
			0
		}
		fn next_u64(&mut self) -> u64 {
			0
		}
		fn fill_bytes(&mut self, dst: &mut [u8]) {
			dst.fill(0);
		}
	}

	/// Every uniform draw is just below 1.0: always the last listed successor.
	struct LastRng;

	impl RngCore for LastRng {
		fn next_u32(&mut self) -> u32 {
			u32::MAX
		}
		fn next_u64(&mut self) -> u64 {
			u64::MAX
		}
		fn fill_bytes(&mut self, dst: &mut [u8]) {
			dst.fill(u8::MAX);
		}
	}

	fn sample_model() -> BigramModel {
		build_model(&["ab", "cd", "ab", "ef"])
	}

	#[test]
	fn huge_step_counts_do_not_reserve_up_front() {
		for max_steps in [usize::MAX, 1 << 44] {
			let walk = Walk::new("ab", max_steps);
			assert_eq!(walk.emitted, vec!["ab"]);
			assert!(walk.emitted.capacity() <= MAX_RESERVED_TOKENS);
		}
	}

	#[test]
	fn reservation_covers_small_requests() {
		let walk = Walk::new("ab", 9);
		assert!(walk.emitted.capacity() >= 10);
	}

	#[test]
	fn picks_first_option_with_a_zero_draw() {
		let model = sample_model();
		let tokens = generate(&model, "ab", 2, &mut FirstRng).unwrap();
		assert_eq!(tokens, vec!["ab", "cd", "ab"]);
	}

	#[test]
	fn falls_back_and_reports_it() {
		let model = sample_model();
		let mut events: Vec<DiagnosticEvent> = Vec::new();
		let tokens = Generator::new(&model).generate("ab", 2, &mut LastRng, &mut events).unwrap();
		assert_eq!(tokens, vec!["ab", "ef", "ab"]);
		assert_eq!(
			events,
			vec![DiagnosticEvent::FallbackTriggered {
				missing_token: "ef".to_owned(),
				chosen_token: "ab".to_owned(),
			}]
		);
	}

	#[test]
	fn unknown_seed_falls_back_on_first_step() {
		let model = sample_model();
		let mut events: Vec<DiagnosticEvent> = Vec::new();
		let tokens = Generator::new(&model).generate("zz", 1, &mut FirstRng, &mut events).unwrap();
		assert_eq!(tokens, vec!["zz", "ab"]);
		assert_eq!(events.len(), 1);
	}

	#[test]
	fn policies_disagree_on_uneven_counts() {
		// a -> b, b -> c, c -> b, b -> d: "b" has 2 observations, every mass is 1.0
		let model = build_model(&["a", "b", "c", "b", "d"]);

		let frequent = Generator::new(&model)
			.generate("zz", 1, &mut FirstRng, &mut Discard)
			.unwrap();
		assert_eq!(frequent, vec!["zz", "b"]);

		let mass = Generator::new(&model)
			.with_fallback(FallbackPolicy::ProbabilityMass)
			.generate("zz", 1, &mut FirstRng, &mut Discard)
			.unwrap();
		assert_eq!(mass, vec!["zz", "a"]);
	}

	#[test]
	fn empty_model_is_an_error() {
		let model = build_model::<&str>(&[]);
		let mut rng = StdRng::seed_from_u64(3);
		assert_eq!(generate(&model, "ab", 5, &mut rng), Err(ModelError::EmptyModel));
		assert_eq!(generate(&model, "ab", 0, &mut rng), Err(ModelError::EmptyModel));
	}

	#[test]
	fn empty_seed_is_an_error() {
		let model = sample_model();
		assert_eq!(generate(&model, "", 3, &mut FirstRng), Err(ModelError::InvalidSeed));
	}

	#[test]
	fn zero_steps_returns_the_seed() {
		let model = sample_model();
		assert_eq!(generate(&model, "zz", 0, &mut FirstRng).unwrap(), vec!["zz"]);
	}

	#[test]
	fn same_seed_same_output() {
		let model = build_model(&["a", "b", "a", "c", "b", "c", "a", "a", "b"]);
		let first = generate(&model, "a", 50, &mut StdRng::seed_from_u64(11)).unwrap();
		let second = generate(&model, "a", 50, &mut StdRng::seed_from_u64(11)).unwrap();
		assert_eq!(first, second);
		assert_eq!(first.len(), 51);
	}

	#[test]
	fn policy_parsing() {
		assert_eq!("most_frequent".parse::<FallbackPolicy>(), Ok(FallbackPolicy::MostFrequent));
		assert_eq!(
			"Probability-Mass".parse::<FallbackPolicy>(),
			Ok(FallbackPolicy::ProbabilityMass)
		);
		assert!("loudest".parse::<FallbackPolicy>().is_err());
		assert_eq!(FallbackPolicy::ProbabilityMass.to_string(), "probability_mass");
	}
}
