use std::collections::BTreeMap;

use rand::Rng;

use super::token::Token;
use crate::error::{MarkoError, Result};

/// Represents a state of the chain.
///
/// A `State` corresponds to a fixed window of `k` preceding tokens (`key`)
/// and stores all observed transitions from this window to the next token.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Predict the next token using weighted random sampling
/// - Merge with another state having the same key (parallel learning support)
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
/// - Transitions iterate in `Token` order, so a seeded RNG replays the same draws
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
	/// Window of preceding tokens identifying the state.
	key: Vec<Token>,
	/// Outgoing transitions indexed by the next token.
	/// Example: { Word("sat") => 2, End => 1 }
	transitions: BTreeMap<Token, usize>,
}

impl State {
	/// Creates a new empty state for the given window.
	pub fn new(key: &[Token]) -> Self {
		Self {
			key: key.to_vec(),
			transitions: BTreeMap::new(),
		}
	}

	/// Records an occurrence of a transition toward `next`.
	pub fn add_transition(&mut self, next: Token) {
		*self.transitions.entry(next).or_insert(0) += 1;
	}

	/// Number of times the transition toward `next` was observed.
	pub fn count(&self, next: &Token) -> usize {
		self.transitions.get(next).copied().unwrap_or(0)
	}

	/// Iterates over `(next token, occurrence count)` pairs.
	pub fn transitions(&self) -> impl Iterator<Item = (&Token, usize)> {
		self.transitions.iter().map(|(t, c)| (t, *c))
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Total number of observations leaving this state.
	pub fn total(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Predicts the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count: a uniform draw in `0..total` is walked down the
	/// transitions by cumulative subtraction.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&Token> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		let mut fallback = None;
		for (next, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next);
			}
			r -= occurrence;
			fallback = Some(next);
		}

		// Unreachable while counts sum to `total`
		fallback
	}

	/// Merges another state into this one by summing occurrence counts.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the state keys do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.key != other.key {
			return Err(MarkoError::InvalidArgument("State key mismatch".to_owned()));
		}

		for (next, occurrence) in &other.transitions {
			*self.transitions.entry(next.clone()).or_insert(0) += *occurrence;
		}

		Ok(())
	}
}
