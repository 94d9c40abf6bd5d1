//! HTTP surface of the sentence generator.

/// Route handlers and their error mapping.
pub mod api;
