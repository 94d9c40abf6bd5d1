use serde::Deserialize;

/// A training sentence: whitespace-delimited words, never empty.
pub type Sentence = Vec<String>;

/// How a line of raw text is cut into training sentences.
///
/// - `Lines`: every non-empty line is one sentence.
/// - `Punctuation`: lines are further cut after `.`, `!` or `?` when the next
///   word starts with an uppercase letter (abbreviations excepted).
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentenceSplit {
	#[default]
	Lines,
	Punctuation,
}

/// Abbreviations that end with a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
	"e.g.", "i.e.", "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "no.",
];

/// Splits raw text into tokenized training sentences.
///
/// The tokenizer is a pure function of its input: it holds only its
/// configuration and tokenizing the same text twice yields the same output.
///
/// # Guarantees
/// - Every emitted sentence has at least one word.
/// - Words never contain whitespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tokenizer {
	split: SentenceSplit,
	well_formed: bool,
}

impl Tokenizer {
	/// Creates a tokenizer.
	///
	/// With `well_formed`, sentences containing quotes, parentheses or
	/// brackets, or words starting/ending with an apostrophe, are dropped.
	pub fn new(split: SentenceSplit, well_formed: bool) -> Self {
		Self { split, well_formed }
	}

	/// Tokenizes a block of text (split on `\n` / `\r\n`).
	pub fn tokenize(&self, text: &str) -> Vec<Sentence> {
		self.tokenize_lines(text.lines())
	}

	/// Tokenizes an ordered sequence of lines.
	pub fn tokenize_lines<I, S>(&self, lines: I) -> Vec<Sentence>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut sentences = Vec::new();
		for line in lines {
			let words: Vec<&str> = line.as_ref().split_whitespace().collect();
			if words.is_empty() {
				continue;
			}
			match self.split {
				SentenceSplit::Lines => self.push_unit(&mut sentences, &words),
				SentenceSplit::Punctuation => {
					let mut start = 0;
					for i in 0..words.len() - 1 {
						if ends_sentence(words[i], words[i + 1]) {
							self.push_unit(&mut sentences, &words[start..=i]);
							start = i + 1;
						}
					}
					self.push_unit(&mut sentences, &words[start..]);
				}
			}
		}
		sentences
	}

	fn push_unit(&self, sentences: &mut Vec<Sentence>, words: &[&str]) {
		if words.is_empty() {
			return;
		}
		if self.well_formed && !is_well_formed(words) {
			return;
		}
		sentences.push(words.iter().map(|w| (*w).to_owned()).collect());
	}
}

/// Decides whether a sentence boundary sits between `word` and `next`.
fn ends_sentence(word: &str, next: &str) -> bool {
	if !word.ends_with(['.', '!', '?']) {
		return false;
	}
	if !next.chars().next().is_some_and(char::is_uppercase) {
		return false;
	}
	if !word.ends_with('.') {
		return true;
	}
	let lower = word.to_lowercase();
	if ABBREVIATIONS.contains(&lower.as_str()) {
		return false;
	}
	// Single-letter initials ("J.")
	let mut chars = word.chars();
	!matches!((chars.next(), chars.next(), chars.next()), (Some(c), Some('.'), None) if c.is_alphabetic())
}

fn is_well_formed(words: &[&str]) -> bool {
	words.iter().all(|w| {
		!w.starts_with('\'')
			&& !w.ends_with('\'')
			&& !w.contains(['"', '(', ')', '[', ']'])
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn words(sentences: &[Sentence]) -> Vec<String> {
		sentences.iter().map(|s| s.join(" ")).collect()
	}

	#[test]
	fn one_sentence_per_non_empty_line() {
		let tokenizer = Tokenizer::default();
		let out = tokenizer.tokenize("the cat sat\n\n   \r\nthe  cat\tran\r\n");
		assert_eq!(out, vec![vec!["the", "cat", "sat"], vec!["the", "cat", "ran"]]);
	}

	#[test]
	fn line_split_keeps_punctuation_inside_a_line() {
		let tokenizer = Tokenizer::default();
		let out = tokenizer.tokenize("First one. Second one.");
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].len(), 4);
	}

	#[test]
	fn empty_text_yields_nothing() {
		assert!(Tokenizer::default().tokenize("").is_empty());
		assert!(Tokenizer::default().tokenize(" \n\t\n").is_empty());
		assert!(Tokenizer::default().tokenize_lines(Vec::<String>::new()).is_empty());
	}

	#[test]
	fn punctuation_split_cuts_on_sentence_ends() {
		let tokenizer = Tokenizer::new(SentenceSplit::Punctuation, false);
		let out = tokenizer.tokenize("It rains. Dr. Who stays home! Does J. Smith? yes. Fine");
		assert_eq!(
			words(&out),
			vec!["It rains.", "Dr. Who stays home!", "Does J. Smith? yes.", "Fine"]
		);
	}

	#[test]
	fn well_formed_drops_quoted_units() {
		let tokenizer = Tokenizer::new(SentenceSplit::Lines, true);
		let out = tokenizer.tokenize("a (b) c\nhe said \"hi\"\n'tis fine\nit's fine\n");
		assert_eq!(words(&out), vec!["it's fine"]);
	}
}
