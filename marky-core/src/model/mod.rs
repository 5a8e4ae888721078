//! Top-level module for the word chain.
//!
//! - Token normalization and the terminator sentinel (`token`)
//! - Per-token successor lists (`Successors`)
//! - The transition table with its counts and totals (`TransitionTable`)
//! - Randomness providers (`RandomSource`)
//! - The sampling and generation interface (`Chain`)

/// Case folding and the reserved end-of-sentence token.
pub mod token;

/// Ordered, duplicate-free successor list of a single token.
pub mod successors;

/// Token -> successors and token -> total maps, updated together.
///
/// Independent of randomness so partial tables can be built on worker
/// threads and merged.
pub mod table;

/// Uniform `[0, 1)` draws behind a trait so tests can script them.
pub mod random;

/// High-level chain: ingestion, normalization, sampling and generation.
pub mod chain;
