use std::ops::RangeInclusive;

use serde::Deserialize;

use super::chain::{DEFAULT_STATE_SIZE, clamp_state_size};
use super::novelty::{DEFAULT_MAX_OVERLAP_RATIO, DEFAULT_MAX_OVERLAP_TOTAL};
use super::sampler::StartSeed;
use super::tokenizer::{SentenceSplit, Tokenizer};
use crate::error::{MarkoError, Result};

pub const DEFAULT_COUNT: usize = 30;
pub const DEFAULT_MIN_TRIES: usize = 1_000;
pub const DEFAULT_MAX_TRIES: usize = 50_000;
pub const DEFAULT_STEP_LIMIT: usize = 500;

/// Input parameters of one generation request.
///
/// Every field has a default, so a partially filled query string or an
/// empty struct literal with `..Default::default()` is valid.
///
/// # Invariants
/// - `state_size` is never rejected: out-of-range values are clamped to the
///   default by [`GenerationParams::state_size`].
/// - Everything else is checked by [`GenerationParams::validate`].
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GenerationParams {
	/// Window length `k` of the chain (1..=5, default 2).
	pub state_size: usize,

	/// Number of sentences to attempt; the result holds at most this many.
	pub count: usize,

	/// Inclusive range the per-sentence try budget is drawn from.
	pub min_tries: usize,
	pub max_tries: usize,

	/// Maximum number of words one sampler run may emit.
	pub step_limit: usize,

	/// Whether to reject sentences copying the corpus (see `OverlapFilter`).
	/// Off by default, so a corpus with a single path still yields it.
	pub test_output: bool,
	pub max_overlap_ratio: f32,
	pub max_overlap_total: usize,

	/// Optional bounds on the generated sentences.
	pub min_words: Option<usize>,
	pub max_words: Option<usize>,
	pub max_chars: Option<usize>,

	/// How raw text is cut into training sentences.
	pub split: SentenceSplit,

	/// Drop training sentences with quotes, parentheses or brackets.
	pub well_formed: bool,

	/// Words every sentence must start with.
	pub start: Option<String>,
}

impl Default for GenerationParams {
	fn default() -> Self {
		Self {
			state_size: DEFAULT_STATE_SIZE,
			count: DEFAULT_COUNT,
			min_tries: DEFAULT_MIN_TRIES,
			max_tries: DEFAULT_MAX_TRIES,
			step_limit: DEFAULT_STEP_LIMIT,
			test_output: false,
			max_overlap_ratio: DEFAULT_MAX_OVERLAP_RATIO,
			max_overlap_total: DEFAULT_MAX_OVERLAP_TOTAL,
			min_words: None,
			max_words: None,
			max_chars: None,
			split: SentenceSplit::Lines,
			well_formed: false,
			start: None,
		}
	}
}

impl GenerationParams {
	/// Effective state size, out-of-range values replaced by the default.
	pub fn state_size(&self) -> usize {
		clamp_state_size(self.state_size)
	}

	/// Range the per-sentence try budget is drawn from.
	pub fn tries(&self) -> RangeInclusive<usize> {
		self.min_tries..=self.max_tries
	}

	pub fn tokenizer(&self) -> Tokenizer {
		Tokenizer::new(self.split, self.well_formed)
	}

	/// Determines the starting seed strategy for every sentence.
	///
	/// # Errors
	/// Returns `InvalidArgument` for a seed made only of whitespace.
	pub fn start_seed(&self) -> Result<StartSeed<'_>> {
		match &self.start {
			None => Ok(StartSeed::Begin),
			Some(s) if s.trim().is_empty() => {
				Err(MarkoError::InvalidArgument("Custom seed cannot be empty".to_owned()))
			}
			Some(s) => Ok(StartSeed::Custom(s.as_str())),
		}
	}

	/// Checks the parameters that cannot be clamped.
	///
	/// # Errors
	/// Returns `InvalidArgument` describing the first offending field.
	pub fn validate(&self) -> Result<()> {
		if self.min_tries == 0 {
			return Err(invalid("min_tries must be >= 1"));
		}
		if self.min_tries > self.max_tries {
			return Err(invalid(format!(
				"min_tries ({}) must not exceed max_tries ({})",
				self.min_tries, self.max_tries
			)));
		}
		if self.step_limit == 0 {
			return Err(invalid("step_limit must be >= 1"));
		}
		if !(self.max_overlap_ratio > 0.0 && self.max_overlap_ratio <= 1.0) {
			return Err(invalid(format!(
				"max_overlap_ratio must be in (0.0, 1.0], got {}",
				self.max_overlap_ratio
			)));
		}
		if let (Some(min), Some(max)) = (self.min_words, self.max_words) {
			if min > max {
				return Err(invalid(format!("min_words ({min}) must not exceed max_words ({max})")));
			}
		}
		self.start_seed()?;
		Ok(())
	}
}

fn invalid(message: impl Into<String>) -> MarkoError {
	MarkoError::InvalidArgument(message.into())
}
