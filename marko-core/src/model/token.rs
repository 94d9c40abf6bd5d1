use std::fmt;

/// A single symbol of the chain vocabulary.
///
/// Besides plain words, two markers frame every training sentence:
/// `Begin` pads the start window and `End` records where a sentence stopped.
///
/// The derived ordering (`Begin < Word(_) < End`, words lexicographic) is what
/// makes transition iteration deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
	Begin,
	Word(String),
	End,
}

impl Token {
	pub fn word(value: &str) -> Self {
		Token::Word(value.to_owned())
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Token::Begin => f.write_str("<BEGIN>"),
			Token::Word(w) => f.write_str(w),
			Token::End => f.write_str("<END>"),
		}
	}
}

/// Renders a window of tokens for error messages.
pub(crate) fn describe(window: &[Token]) -> Vec<String> {
	window.iter().map(Token::to_string).collect()
}
