use marko_core::MarkoError;
use marko_core::model::chain::Chain;
use marko_core::model::sampler::Sampler;
use marko_core::model::token::Token;
use marko_core::model::tokenizer::Tokenizer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn build(lines: &[&str], k: usize) -> Chain {
	Chain::build(&Tokenizer::default().tokenize_lines(lines), k).unwrap()
}

#[test]
fn test_cat_corpus_transitions() {
	let chain = build(&["the cat sat", "the cat ran"], 1);
	let cat = chain.state(&[Token::word("cat")]).unwrap();
	assert_eq!(cat.count(&Token::word("sat")), 1);
	assert_eq!(cat.count(&Token::word("ran")), 1);
	assert_eq!(cat.total(), 2);

	let the = chain.state(&[Token::word("the")]).unwrap();
	assert_eq!(the.count(&Token::word("cat")), 2);

	let begin = chain.state(&[Token::Begin]).unwrap();
	assert_eq!(begin.count(&Token::word("the")), 2);
}

#[test]
fn test_cat_corpus_vocabulary_is_respected() {
	let chain = build(&["the cat sat", "the cat ran"], 1);
	let sampler = Sampler::new(&chain, 50);
	let vocabulary = ["the", "cat", "sat", "ran"];
	let mut rng = ChaCha8Rng::seed_from_u64(7);
	for _ in 0..500 {
		let words = sampler.walk(&mut rng).unwrap();
		assert!(words.iter().all(|w| vocabulary.contains(&w.as_str())), "{words:?}");
	}
}

#[test]
fn test_empty_corpus_fails() {
	assert_eq!(Chain::build(&[], 2), Err(MarkoError::EmptyCorpus));
	let blank = Tokenizer::default().tokenize("\n \n\t");
	assert_eq!(Chain::build(&blank, 2), Err(MarkoError::EmptyCorpus));
}

#[test]
fn test_end_recorded_where_sentences_stop() {
	let chain = build(&["a b", "a b c"], 2);
	let ab = chain.state(&[Token::word("a"), Token::word("b")]).unwrap();
	assert_eq!(ab.count(&Token::End), 1);
	assert_eq!(ab.count(&Token::word("c")), 1);
}

#[test]
fn test_counts_are_deterministic() {
	let lines = ["one fish two fish", "red fish blue fish", "one two red blue"];
	for k in 1..=5 {
		assert_eq!(build(&lines, k), build(&lines, k));
	}
}

#[test]
fn test_weighted_sampling_fairness() {
	// From state [x]: A three times, B once
	let chain = build(&["x A", "x A", "x A", "x B"], 1);
	let state = chain.state(&[Token::word("x")]).unwrap();
	let mut rng = ChaCha8Rng::seed_from_u64(2024);
	let trials = 10_000;
	let mut a = 0;
	let mut b = 0;
	for _ in 0..trials {
		match state.predict(&mut rng) {
			Some(t) if *t == Token::word("A") => a += 1,
			Some(t) if *t == Token::word("B") => b += 1,
			other => panic!("unexpected transition {other:?}"),
		}
	}
	let expected_a = trials as f64 * 0.75;
	assert!((a as f64 - expected_a).abs() < expected_a * 0.1, "A drawn {a} times");
	let ratio = a as f64 / b as f64;
	assert!((2.7..=3.3).contains(&ratio), "A/B ratio was {ratio}");
}

#[test]
fn test_chain_is_shared_across_threads() {
	let chain = build(&["a b c", "a c b", "b a c"], 1);
	let sampler = Sampler::new(&chain, 20);
	std::thread::scope(|scope| {
		for seed in 0..4 {
			scope.spawn(move || {
				let mut rng = ChaCha8Rng::seed_from_u64(seed);
				for _ in 0..100 {
					match sampler.walk(&mut rng) {
						Ok(words) => assert!(words.len() <= 20),
						Err(e) => assert!(e.is_routine()),
					}
				}
			});
		}
	});
}
