use bigram_gen_core::model::{
	BigramModel, DiagnosticEvent, FallbackPolicy, Generator, ModelError, build_model, generate, tokenize,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const ALPHABET: &[char] = &['a', 'b', 'c', 'é', '文', '.', ' ', '\n', '\t', '\u{3000}'];

fn random_text(rng: &mut StdRng) -> String {
	let len = rng.random_range(0..60);
	(0..len).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())]).collect()
}

/// Always draws 0.0, so the first listed successor wins.
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

#[test]
fn tokens_concatenate_back_to_the_text() {
	let mut rng = StdRng::seed_from_u64(1);
	for _ in 0..300 {
		let text = random_text(&mut rng);
		for n in 1..=5 {
			let tokens = tokenize(&text, n).unwrap();
			assert_eq!(tokens.concat(), text, "chunk size {n}");
		}
	}
}

#[test]
fn tokens_respect_the_chunk_bound() {
	let mut rng = StdRng::seed_from_u64(2);
	for _ in 0..300 {
		let text = random_text(&mut rng);
		for n in 1..=5 {
			for token in tokenize(&text, n).unwrap() {
				let chars = token.chars().count();
				assert!(chars >= 1);
				if token.chars().any(char::is_whitespace) {
					assert_eq!(chars, 1, "whitespace token {token:?}");
				} else {
					assert!(chars <= n, "{token:?} longer than {n}");
				}
			}
		}
	}
}

#[test]
fn whitespace_scenario() {
	assert_eq!(tokenize("ab cd", 2).unwrap(), vec!["ab", " ", "cd"]);
}

#[test]
fn distributions_sum_to_one() {
	let mut rng = StdRng::seed_from_u64(3);
	for _ in 0..200 {
		let text = random_text(&mut rng);
		let model = BigramModel::from_text(&text, rng.random_range(1..4)).unwrap();
		for (key, successors) in model.iter() {
			let sum: f64 = successors.map(|(_, p)| p).sum();
			assert!((sum - 1.0).abs() < 1e-9, "{key:?} sums to {sum}");
		}
	}
}

#[test]
fn keys_are_exactly_the_tokens_followed_by_another() {
	let mut rng = StdRng::seed_from_u64(4);
	for _ in 0..200 {
		let text = random_text(&mut rng);
		let tokens = tokenize(&text, 2).unwrap();
		let model = build_model(&tokens);
		let heads = &tokens[..tokens.len().saturating_sub(1)];
		for (i, token) in tokens.iter().enumerate() {
			assert_eq!(model.contains(token), heads.contains(token), "token {token:?} at {i}");
		}
		assert!(model.predecessors().all(|k| heads.contains(&k)));
	}
}

#[test]
fn generation_has_max_steps_plus_one_tokens() {
	let mut rng = StdRng::seed_from_u64(5);
	let model = BigramModel::from_text("the maned wolf is the tallest wild canid", 2).unwrap();
	for steps in [0, 1, 7, 100] {
		let tokens = generate(&model, "th", steps, &mut rng).unwrap();
		assert_eq!(tokens.len(), steps + 1);
		assert_eq!(tokens[0], "th");
	}
}

#[test]
fn every_generated_transition_exists_or_was_reported() {
	let mut rng = StdRng::seed_from_u64(6);
	let model = BigramModel::from_text("ab cd ab ef ab cd", 2).unwrap();
	let mut events: Vec<DiagnosticEvent> = Vec::new();
	let tokens = Generator::new(&model).generate("ab", 200, &mut rng, &mut events).unwrap();

	let mut misses = 0;
	for pair in tokens.windows(2) {
		if model.contains(pair[0]) {
			assert!(model.probability(pair[0], pair[1]).is_some(), "{pair:?}");
		} else {
			misses += 1;
		}
	}
	assert_eq!(misses, events.len());
}

#[test]
fn empty_model_cannot_generate() {
	let model = BigramModel::from_text("a", 2).unwrap();
	assert!(model.is_empty());
	assert_eq!(generate(&model, "a", 10, &mut FirstRng), Err(ModelError::EmptyModel));
}

#[test]
fn concrete_scenario() {
	let model = build_model(&["ab", "cd", "ab", "ef"]);
	let json = serde_json::to_value(&model).unwrap();
	assert_eq!(json, serde_json::json!({"ab": {"cd": 0.5, "ef": 0.5}, "cd": {"ab": 1.0}}));

	let tokens = generate(&model, "ab", 2, &mut FirstRng).unwrap();
	assert_eq!(tokens, vec!["ab", "cd", "ab"]);
}

#[test]
fn literal_fallback_prefers_the_first_observed_token() {
	let model = BigramModel::from_text("xy zz zz zz zz", 2).unwrap();
	let mut events: Vec<DiagnosticEvent> = Vec::new();
	let tokens = Generator::new(&model)
		.with_fallback(FallbackPolicy::ProbabilityMass)
		.generate("qq", 1, &mut FirstRng, &mut events)
		.unwrap();
	assert_eq!(tokens, vec!["qq", "xy"]);
	assert_eq!(
		events,
		vec![DiagnosticEvent::FallbackTriggered {
			missing_token: "qq".to_owned(),
			chosen_token: "xy".to_owned(),
		}]
	);
}
