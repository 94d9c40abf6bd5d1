//! Top-level module for the sentence generation system.
//!
//! Components, bottom-up:
//! - Corpus tokenization (`Tokenizer`)
//! - Transition table construction (`Chain`, `State`)
//! - Single sentence sampling (`Sampler`)
//! - Request-level orchestration (`Generator`, `GenerationParams`)

/// Vocabulary symbols, including the `Begin` / `End` sentence markers.
pub mod token;

/// Raw text to training sentences.
///
/// Pure: the same text always yields the same sentences.
pub mod tokenizer;

/// Single state of the chain (window + weighted transitions).
///
/// Supports weighted random sampling and merging.
pub mod state;

/// Word-level Markov chain of order `k`.
///
/// Handles sentence padding, transition counting, parallel construction
/// and merging.
pub mod chain;

/// Random walk over a chain, bounded by a step limit.
pub mod sampler;

/// Rejection of sentences copying the training text.
pub mod novelty;

/// Generation parameters and their validation.
pub mod params;

/// Generation session: retry budgets, filters and de-duplication.
pub mod generator;
