//! Markov-chain sentence generation library.
//!
//! This crate turns raw natural-language text into new, plausible sentences:
//! - Line (or punctuation) based sentence splitting and whitespace tokenization
//! - Word-level Markov chains of configurable order (state size 1 to 5)
//! - Weighted random walks bounded by a step limit
//! - Generation sessions with retry budgets, novelty rejection and de-duplication
//!
//! Every session builds its own chain: no model or RNG outlives a call.

/// Tokenizer, chain, sampler and generation session.
pub mod model;

/// Error type shared by the whole crate.
pub mod error;

pub use error::{MarkoError, Result};
pub use model::generator::{Generator, generate, generate_with_rng};
pub use model::params::GenerationParams;
