use std::collections::HashMap;

use super::tokenizer::Sentence;

/// Default share of a sentence's words that may be copied verbatim.
pub const DEFAULT_MAX_OVERLAP_RATIO: f32 = 0.7;

/// Default longest verbatim run of words, whatever the sentence length.
pub const DEFAULT_MAX_OVERLAP_TOTAL: usize = 15;

/// Rejects generated sentences that copy the corpus too closely.
///
/// For a sentence of `len` words the longest tolerated verbatim run is
/// `overlap = min(max_overlap_total, round(max_overlap_ratio * len))`.
/// The sentence is rejected when a run of `overlap + 1` consecutive words
/// (the whole sentence if it is shorter) appears in the corpus, all training
/// sentences laid end to end.
///
/// # Notes
/// - Runs are compared word by word, so `cat` never matches inside
///   `concatenate`.
/// - The corpus is indexed once by consecutive word pairs; a lookup only
///   compares the places where the run's first two words occur.
#[derive(Clone, Debug)]
pub struct OverlapFilter {
	/// Corpus words as vocabulary ids, in order
	words: Vec<usize>,
	vocabulary: HashMap<String, usize>,
	/// Start positions in `words` of every pair of consecutive ids
	pairs: HashMap<(usize, usize), Vec<usize>>,
	max_overlap_ratio: f32,
	max_overlap_total: usize,
}

impl OverlapFilter {
	pub fn new(corpus: &[Sentence], max_overlap_ratio: f32, max_overlap_total: usize) -> Self {
		let mut vocabulary = HashMap::new();
		let mut words = Vec::new();
		for word in corpus.iter().flatten() {
			let next = vocabulary.len();
			words.push(*vocabulary.entry(word.clone()).or_insert(next));
		}

		let mut pairs: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
		for (start, pair) in words.windows(2).enumerate() {
			pairs.entry((pair[0], pair[1])).or_default().push(start);
		}

		Self { words, vocabulary, pairs, max_overlap_ratio, max_overlap_total }
	}

	/// Length of the longest tolerated verbatim run for a sentence of `len` words.
	pub fn max_overlap(&self, len: usize) -> usize {
		let by_ratio = (self.max_overlap_ratio * len as f32).round() as usize;
		by_ratio.min(self.max_overlap_total)
	}

	/// Returns `true` if no run longer than `max_overlap(len)` words is copied
	/// from the corpus.
	pub fn is_novel(&self, words: &[String]) -> bool {
		if words.is_empty() {
			return true;
		}
		let overlap = self.max_overlap(words.len());
		let run = (overlap + 1).min(words.len());
		let runs = words.len().saturating_sub(overlap).max(1);

		let ids: Vec<Option<usize>> = words.iter().map(|w| self.vocabulary.get(w).copied()).collect();
		(0..runs).all(|start| !self.contains(&ids[start..start + run]))
	}

	/// Whether `run` occurs as consecutive corpus words. `None` is a word the
	/// corpus never uses.
	fn contains(&self, run: &[Option<usize>]) -> bool {
		let Some(run) = run.iter().copied().collect::<Option<Vec<usize>>>() else {
			return false;
		};
		match run.as_slice() {
			[] => false,
			[_] => true,
			[first, second, ..] => self.pairs.get(&(*first, *second)).is_some_and(|starts| {
				starts
					.iter()
					.any(|&start| self.words.get(start..start + run.len()) == Some(run.as_slice()))
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sentence(s: &str) -> Sentence {
		s.split_whitespace().map(str::to_owned).collect()
	}

	fn filter(lines: &[&str]) -> OverlapFilter {
		let corpus: Vec<Sentence> = lines.iter().map(|l| sentence(l)).collect();
		OverlapFilter::new(&corpus, DEFAULT_MAX_OVERLAP_RATIO, DEFAULT_MAX_OVERLAP_TOTAL)
	}

	#[test]
	fn overlap_window_follows_ratio_and_cap() {
		let f = filter(&[]);
		assert_eq!(f.max_overlap(1), 1);
		assert_eq!(f.max_overlap(2), 1);
		assert_eq!(f.max_overlap(4), 3);
		assert_eq!(f.max_overlap(10), 7);
		assert_eq!(f.max_overlap(100), 15);
	}

	#[test]
	fn verbatim_sentences_are_rejected() {
		let f = filter(&["the cat sat on the mat", "a dog ran in the park"]);
		assert!(!f.is_novel(&sentence("the cat sat on the mat")));
		// 6 words tolerate runs of 4; "a dog ran in the" is a run of 5
		assert!(!f.is_novel(&sentence("a dog ran in the mat")));
		assert!(f.is_novel(&sentence("the cat ran in the park")));
		assert!(f.is_novel(&sentence("the cat sat in the park")));
	}

	#[test]
	fn tolerated_run_length_is_accepted() {
		let f = filter(&["a b", "c d"]);
		assert!(f.is_novel(&sentence("a d")));
		assert!(!f.is_novel(&sentence("c d")));

		// 4 words tolerate runs of 3, so only a full copy is rejected
		let f = filter(&["x p q r", "y p q s"]);
		assert!(f.is_novel(&sentence("x p q s")));
		assert!(f.is_novel(&sentence("y p q r")));
		assert!(!f.is_novel(&sentence("y p q s")));
	}

	#[test]
	fn runs_may_span_training_sentences() {
		let f = filter(&["a b", "c d"]);
		assert!(!f.is_novel(&sentence("b c")));
	}

	#[test]
	fn matches_respect_word_boundaries() {
		let f = filter(&["concatenate strings quickly"]);
		// "cat" only appears inside a longer word
		assert!(f.is_novel(&sentence("cat")));
		assert!(!f.is_novel(&sentence("strings")));
	}

	#[test]
	fn unknown_words_never_match() {
		let f = filter(&["the cat sat"]);
		assert!(f.is_novel(&sentence("the dog sat")));
		assert!(f.is_novel(&sentence("zebra")));
	}
}
