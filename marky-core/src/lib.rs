//! Word-level Markov chain text generation library.
//!
//! This crate provides a first-order word transition model including:
//! - Incremental construction from whitespace-tokenized sentences
//! - Normalization of occurrence counts into probabilities
//! - Weighted random sampling of successors and sentence generation
//! - A substitutable randomness source for reproducible generation
//!
//! Text sources and presentation (files, consoles, HTTP) stay outside the
//! model; they feed it sentences and print what it returns.

/// Chain, transition table and sampling.
pub mod model;

/// Generation settings shared by the binaries.
pub mod config;

/// Error type for the fallible edges of the crate.
pub mod error;

/// Text file helpers.
///
/// Not exposed
pub(crate) mod io;

pub use error::{MarkyError, Result};
