use rand::Rng;

use super::chain::Chain;
use super::token::{Token, describe};
use crate::error::{MarkoError, Result};

/// Strategy used to select the starting window of a sentence.
///
/// # Variants
/// - `Begin`: start from `k` `Begin` markers, like every training sentence.
/// - `Custom(&str)`: start from the given words. With fewer than `k` words
///   the window is left-padded with `Begin`, so the words must open a
///   training sentence; with `k` or more, the last `k` words form the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartSeed<'a> {
	#[default]
	Begin,
	Custom(&'a str),
}

/// A resolved starting point: the first window and the words already
/// belonging to the sentence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Start {
	window: Vec<Token>,
	prefix: Vec<String>,
}

/// Walks a [`Chain`] to produce one sentence per run.
///
/// A sampler borrows its chain immutably: any number of samplers may walk
/// the same chain from different threads.
#[derive(Clone, Copy, Debug)]
pub struct Sampler<'c> {
	chain: &'c Chain,
	step_limit: usize,
}

impl<'c> Sampler<'c> {
	/// Creates a sampler emitting at most `step_limit` words per run.
	pub fn new(chain: &'c Chain, step_limit: usize) -> Self {
		Self { chain, step_limit }
	}

	/// Resolves a start seed against the chain.
	///
	/// # Errors
	/// - `InvalidArgument` if a custom seed has no words.
	/// - `UnknownSeed` if the resulting window was never seen in training.
	pub fn start(&self, seed: &StartSeed) -> Result<Start> {
		let k = self.chain.state_size();
		let seed = match seed {
			StartSeed::Begin => {
				return Ok(Start { window: self.chain.begin_state(), prefix: Vec::new() });
			}
			StartSeed::Custom(s) => *s,
		};

		let prefix: Vec<String> = seed.split_whitespace().map(str::to_owned).collect();
		if prefix.is_empty() {
			return Err(MarkoError::InvalidArgument("Custom seed cannot be empty".to_owned()));
		}

		let mut window = Vec::with_capacity(k);
		let tail = &prefix[prefix.len().saturating_sub(k)..];
		window.extend(std::iter::repeat_n(Token::Begin, k - tail.len()));
		window.extend(tail.iter().map(|w| Token::Word(w.clone())));

		if self.chain.state(&window).is_none() {
			return Err(MarkoError::UnknownSeed(seed.to_owned()));
		}
		Ok(Start { window, prefix })
	}

	/// Samples one sentence from the `Begin` window.
	pub fn walk<R: Rng>(&self, rng: &mut R) -> Result<Vec<String>> {
		let start = Start { window: self.chain.begin_state(), prefix: Vec::new() };
		self.walk_from(&start, rng)
	}

	/// Samples one sentence from a resolved start.
	///
	/// At each step the current window's transitions are sampled by weight;
	/// `End` finishes the sentence, a word is appended and the window slides
	/// forward by one token.
	///
	/// # Returns
	/// The words of the sentence, markers excluded, seed words included.
	///
	/// # Errors
	/// - `DeadEnd` if the current window has no recorded continuation.
	/// - `StepLimitExceeded` if `step_limit` words were emitted without
	///   reaching `End`.
	pub fn walk_from<R: Rng>(&self, start: &Start, rng: &mut R) -> Result<Vec<String>> {
		let mut window = start.window.clone();
		let mut words = start.prefix.clone();
		let mut emitted = 0;

		loop {
			let next = self
				.chain
				.state(&window)
				.and_then(|state| state.predict(rng))
				.ok_or_else(|| MarkoError::DeadEnd { state: describe(&window) })?;

			match next {
				Token::End => return Ok(words),
				Token::Word(word) => {
					if emitted == self.step_limit {
						return Err(MarkoError::StepLimitExceeded { limit: self.step_limit });
					}
					emitted += 1;
					words.push(word.clone());
					window.rotate_left(1);
					if let Some(last) = window.last_mut() {
						*last = next.clone();
					}
				}
				// `Begin` never follows a window
				Token::Begin => return Err(MarkoError::DeadEnd { state: describe(&window) }),
			}
		}
	}
}
