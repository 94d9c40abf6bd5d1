use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::debug;

use super::state::State;
use super::token::Token;
use super::tokenizer::Sentence;
use crate::error::{MarkoError, Result};

/// State size used when the requested one is out of range.
pub const DEFAULT_STATE_SIZE: usize = 2;

/// Largest accepted state size.
pub const MAX_STATE_SIZE: usize = 5;

/// Returns `state_size` if it lies in `1..=MAX_STATE_SIZE`, else the default.
///
/// Out-of-range values are not an error: they fall back silently.
pub fn clamp_state_size(state_size: usize) -> usize {
	if (1..=MAX_STATE_SIZE).contains(&state_size) {
		state_size
	} else {
		DEFAULT_STATE_SIZE
	}
}

/// Represents a word-level Markov chain of order `k`.
///
/// The `Chain` maps every window of `k` consecutive tokens seen in training
/// to the tokens that followed it, with occurrence counts.
///
/// # Responsibilities
/// - Build the transition table from tokenized sentences
/// - Expose read-only lookups for the sampler
/// - Merge with another chain of the same order (parallel build)
///
/// # Invariants
/// - `1 <= state_size <= MAX_STATE_SIZE`
/// - Every stored state has at least one outgoing transition
/// - The chain is never mutated once built and handed out, so it can be
///   shared across threads by reference
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
	state_size: usize,

	/// Mapping from a window of `state_size` tokens to its state
	states: HashMap<Vec<Token>, State>,
}

impl Chain {
	/// Builds a chain of order `state_size` (clamped) from a tokenized corpus.
	///
	/// # Errors
	/// Returns `EmptyCorpus` if no sentence has at least one word.
	pub fn build(corpus: &[Sentence], state_size: usize) -> Result<Self> {
		let mut chain = Self::empty(clamp_state_size(state_size));
		for sentence in corpus {
			chain.add_sentence(sentence);
		}
		chain.finish(corpus.len())
	}

	/// Builds the same chain as [`Chain::build`] on several threads.
	///
	/// # Behavior
	/// - Splits the corpus into chunks (based on CPU cores * factor).
	/// - Builds one partial chain per chunk on a scoped thread.
	/// - Merges all partial chains; counts are summed so the result does not
	///   depend on chunking or thread scheduling.
	pub fn build_parallel(corpus: &[Sentence], state_size: usize) -> Result<Self> {
		let state_size = clamp_state_size(state_size);
		if corpus.is_empty() {
			return Err(MarkoError::EmptyCorpus);
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = corpus.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for chunk in corpus.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let mut partial = Self::empty(state_size);
					for sentence in chunk {
						partial.add_sentence(sentence);
					}
					// The receiver outlives the scope
					let _ = tx.send(partial);
				});
			}
		});
		drop(tx);

		let mut chain = Self::empty(state_size);
		for partial in rx.iter() {
			chain.merge(&partial)?;
		}
		chain.finish(corpus.len())
	}

	fn empty(state_size: usize) -> Self {
		Self { state_size, states: HashMap::new() }
	}

	fn finish(self, sentences: usize) -> Result<Self> {
		if self.states.is_empty() {
			return Err(MarkoError::EmptyCorpus);
		}
		debug!(
			"Chain built: k={}, {} sentences, {} states",
			self.state_size,
			sentences,
			self.states.len()
		);
		Ok(self)
	}

	/// Adds one sentence to the transition table.
	///
	/// The sentence is padded with `state_size` `Begin` markers and one `End`
	/// marker, then every window is recorded with the token that follows it.
	/// Empty sentences are ignored.
	fn add_sentence(&mut self, sentence: &[String]) {
		if sentence.is_empty() {
			return;
		}

		let mut padded = Vec::with_capacity(self.state_size + sentence.len() + 1);
		padded.extend(std::iter::repeat_n(Token::Begin, self.state_size));
		padded.extend(sentence.iter().map(|w| Token::Word(w.clone())));
		padded.push(Token::End);

		for window in padded.windows(self.state_size + 1) {
			let (key, next) = window.split_at(self.state_size);
			self.states
				.entry(key.to_vec())
				.or_insert_with(|| State::new(key))
				.add_transition(next[0].clone());
		}
	}

	/// Order of the chain (the window length `k`).
	pub fn state_size(&self) -> usize {
		self.state_size
	}

	/// The window every sentence starts from: `k` `Begin` markers.
	pub fn begin_state(&self) -> Vec<Token> {
		vec![Token::Begin; self.state_size]
	}

	/// Looks up the state for a window of exactly `state_size` tokens.
	pub fn state(&self, window: &[Token]) -> Option<&State> {
		self.states.get(window)
	}

	pub fn states(&self) -> impl Iterator<Item = &State> {
		self.states.values()
	}

	/// Number of distinct states.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Merges another chain into this one.
	///
	/// # Notes
	/// - Occurrence counts for matching states and transitions are summed.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the state sizes do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.state_size != other.state_size {
			return Err(MarkoError::InvalidArgument(format!(
				"State size mismatch: self={}, other={}",
				self.state_size, other.state_size
			)));
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}
}
