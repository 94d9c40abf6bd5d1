use std::collections::HashSet;

use log::{info, trace};
use rand::Rng;

use super::chain::Chain;
use super::novelty::OverlapFilter;
use super::params::GenerationParams;
use super::sampler::{Sampler, Start};
use super::tokenizer::Sentence;
use crate::error::Result;

/// Corpora at least this large are built with [`Chain::build_parallel`].
const PARALLEL_BUILD_THRESHOLD: usize = 4_096;

/// One generation session: a chain built from a single corpus and the
/// filters applied to what it produces.
///
/// # Responsibilities
/// - Own the chain for the duration of one request (nothing is cached)
/// - Spend a random try budget per sentence, discarding failed or rejected runs
/// - Collect up to `count` distinct sentences
///
/// # Notes
/// - The chain is read-only once the generator exists; `&Generator` can be
///   shared between threads, each bringing its own RNG.
#[derive(Debug)]
pub struct Generator {
	chain: Chain,
	filter: Option<OverlapFilter>,
	params: GenerationParams,
}

impl Generator {
	/// Tokenizes `text` and builds a generator over it.
	///
	/// # Errors
	/// - `InvalidArgument` if `params` fail validation.
	/// - `EmptyCorpus` if the text holds no usable sentence.
	pub fn new(text: &str, params: GenerationParams) -> Result<Self> {
		let corpus = params.tokenizer().tokenize(text);
		Self::from_corpus(&corpus, params)
	}

	/// Builds a generator over an already tokenized corpus.
	pub fn from_corpus(corpus: &[Sentence], params: GenerationParams) -> Result<Self> {
		params.validate()?;
		let chain = if corpus.len() >= PARALLEL_BUILD_THRESHOLD {
			Chain::build_parallel(corpus, params.state_size())?
		} else {
			Chain::build(corpus, params.state_size())?
		};
		let filter = params.test_output.then(|| {
			OverlapFilter::new(corpus, params.max_overlap_ratio, params.max_overlap_total)
		});
		Ok(Self { chain, filter, params })
	}

	pub fn chain(&self) -> &Chain {
		&self.chain
	}

	fn sampler(&self) -> Sampler<'_> {
		Sampler::new(&self.chain, self.params.step_limit)
	}

	/// Tries up to `tries` sampler runs and returns the first accepted sentence.
	///
	/// # Errors
	/// Only for a start seed that cannot be resolved (`UnknownSeed`,
	/// `InvalidArgument`). Failed or rejected runs just consume a try.
	pub fn make_sentence<R: Rng>(&self, tries: usize, rng: &mut R) -> Result<Option<String>> {
		let sampler = self.sampler();
		let start = sampler.start(&self.params.start_seed()?)?;
		Ok(self.sentence_from(&sampler, &start, tries, rng))
	}

	fn sentence_from<R: Rng>(
		&self,
		sampler: &Sampler<'_>,
		start: &Start,
		tries: usize,
		rng: &mut R,
	) -> Option<String> {
		for _ in 0..tries {
			match sampler.walk_from(start, rng) {
				Ok(words) => {
					if let Some(sentence) = self.accept(&words) {
						return Some(sentence);
					}
				}
				Err(e) => trace!("Run discarded: {e}"),
			}
		}
		None
	}

	/// Applies length bounds and novelty rejection, rendering accepted words.
	fn accept(&self, words: &[String]) -> Option<String> {
		if words.is_empty() {
			return None;
		}
		if self.params.min_words.is_some_and(|min| words.len() < min) {
			return None;
		}
		if self.params.max_words.is_some_and(|max| words.len() > max) {
			return None;
		}
		let sentence = words.join(" ");
		if self.params.max_chars.is_some_and(|max| sentence.chars().count() > max) {
			return None;
		}
		if let Some(filter) = &self.filter {
			if !filter.is_novel(words) {
				return None;
			}
		}
		Some(sentence)
	}

	/// Runs the session: `count` attempts, each with a try budget drawn from
	/// `min_tries..=max_tries`.
	///
	/// # Returns
	/// At most `count` sentences, without duplicates, in the order they were
	/// produced. The list may be shorter, or empty, when attempts fail or
	/// repeat earlier sentences.
	///
	/// # Errors
	/// Only for an unresolvable start seed; sampler failures never surface.
	pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Vec<String>> {
		let sampler = self.sampler();
		let start = sampler.start(&self.params.start_seed()?)?;

		let mut sentences = Vec::new();
		let mut seen = HashSet::new();
		for attempt in 0..self.params.count {
			let tries = rng.random_range(self.params.tries());
			match self.sentence_from(&sampler, &start, tries, rng) {
				Some(sentence) => {
					if seen.insert(sentence.clone()) {
						sentences.push(sentence);
					} else {
						trace!("Attempt {attempt}: duplicate dropped");
					}
				}
				None => trace!("Attempt {attempt}: no sentence within {tries} tries"),
			}
		}

		info!(
			"Generated {} distinct sentences out of {} attempts ({} states)",
			sentences.len(),
			self.params.count,
			self.chain.len()
		);
		Ok(sentences)
	}
}

/// Generates sentences from raw text with the thread-local RNG.
///
/// Builds a fresh chain for this call only.
pub fn generate(text: &str, params: GenerationParams) -> Result<Vec<String>> {
	generate_with_rng(text, params, &mut rand::rng())
}

/// Same as [`generate`] with a caller-provided RNG (reproducible runs).
pub fn generate_with_rng<R: Rng>(text: &str, params: GenerationParams, rng: &mut R) -> Result<Vec<String>> {
	Generator::new(text, params)?.generate(rng)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::MarkoError;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	fn quick(params: GenerationParams) -> GenerationParams {
		GenerationParams { min_tries: 5, max_tries: 20, ..params }
	}

	#[test]
	fn word_bounds_filter_sentences() {
		let text = "a b c d e\nx y";
		let params = quick(GenerationParams {
			state_size: 1,
			test_output: false,
			min_words: Some(3),
			..Default::default()
		});
		let generator = Generator::new(text, params).unwrap();
		let mut rng = ChaCha8Rng::seed_from_u64(1);
		let out = generator.generate(&mut rng).unwrap();
		assert_eq!(out, vec!["a b c d e"]);
	}

	#[test]
	fn max_chars_filters_sentences() {
		let params = quick(GenerationParams { test_output: false, max_chars: Some(3), ..Default::default() });
		let generator = Generator::new("abcd efgh", params).unwrap();
		let mut rng = ChaCha8Rng::seed_from_u64(1);
		assert!(generator.generate(&mut rng).unwrap().is_empty());
	}

	#[test]
	fn make_sentence_gives_up_after_budget() {
		// The only path is verbatim, so novelty rejection refuses it
		let params = quick(GenerationParams { test_output: true, ..Default::default() });
		let generator = Generator::new("only one path here", params).unwrap();
		let mut rng = ChaCha8Rng::seed_from_u64(1);
		assert_eq!(generator.make_sentence(50, &mut rng), Ok(None));
	}

	#[test]
	fn unknown_start_fails_the_request() {
		let params = quick(GenerationParams { start: Some("zebra".to_owned()), ..Default::default() });
		let generator = Generator::new("the cat sat", params).unwrap();
		let mut rng = ChaCha8Rng::seed_from_u64(1);
		assert_eq!(generator.generate(&mut rng), Err(MarkoError::UnknownSeed("zebra".to_owned())));
	}

	#[test]
	fn invalid_params_fail_before_building() {
		let params = GenerationParams { step_limit: 0, ..Default::default() };
		assert!(matches!(Generator::new("a b c", params), Err(MarkoError::InvalidArgument(_))));
	}
}
