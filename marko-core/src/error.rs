use thiserror::Error;

/// Errors raised while building a chain or generating sentences.
///
/// Two families live here:
/// - request-level failures (`EmptyCorpus`, `UnknownSeed`, `InvalidArgument`)
///   that the caller must see,
/// - per-run sampler failures (`DeadEnd`, `StepLimitExceeded`) that the
///   generation session absorbs. See [`MarkoError::is_routine`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkoError {
	#[error("Empty corpus: no usable training sentence")]
	EmptyCorpus,

	#[error("Dead end: no transition recorded from state {state:?}")]
	DeadEnd { state: Vec<String> },

	#[error("Step limit exceeded: no end of sentence after {limit} tokens")]
	StepLimitExceeded { limit: usize },

	#[error("Unknown seed: '{0}' does not start any recorded state")]
	UnknownSeed(String),

	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}

impl MarkoError {
	/// Returns `true` for failures of a single sampling run.
	///
	/// These are expected on sparse corpora: the session discards the run
	/// and moves on instead of failing the request.
	pub fn is_routine(&self) -> bool {
		matches!(self, MarkoError::DeadEnd { .. } | MarkoError::StepLimitExceeded { .. })
	}
}

pub type Result<T> = std::result::Result<T, MarkoError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sampler_failures_are_routine() {
		assert!(MarkoError::DeadEnd { state: vec!["a".into()] }.is_routine());
		assert!(MarkoError::StepLimitExceeded { limit: 3 }.is_routine());
		assert!(!MarkoError::EmptyCorpus.is_routine());
		assert!(!MarkoError::UnknownSeed("x".into()).is_routine());
		assert!(!MarkoError::InvalidArgument("x".into()).is_routine());
	}

	#[test]
	fn messages_name_the_condition() {
		assert_eq!(
			MarkoError::StepLimitExceeded { limit: 7 }.to_string(),
			"Step limit exceeded: no end of sentence after 7 tokens"
		);
		assert!(MarkoError::EmptyCorpus.to_string().starts_with("Empty corpus"));
	}
}
