use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};

use super::successors::Successors;
use super::token;

/// Observed word transitions and their per-token totals.
///
/// Conceptually, each key is a node of a first-order Markov chain and its
/// successor list holds the weighted outgoing edges.
///
/// ## Responsibilities:
/// - Accumulate transitions from sentences or explicit pairs
/// - Normalize occurrence counts into probabilities
/// - Merge with another table (parallel learning support)
///
/// ## Invariants
/// - For every key, `totals[key]` equals the sum of its successor counts
/// - Both maps always hold the same keys
/// - The terminator is never a key
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionTable {
	/// Successor lists indexed by case-folded token.
	/// Example: { "the" => [cat x2, dog x1] }
	transitions: BTreeMap<String, Successors>,
	/// Number of successor observations recorded per token.
	totals: BTreeMap<String, usize>,
}

impl TransitionTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from lines of text using every available core.
	///
	/// Splits the lines into chunks (CPU cores * factor), builds a partial
	/// table per chunk on its own thread, then merges the partial tables in
	/// chunk order. The result is identical to calling `add_sentence` on each
	/// line in sequence, successor order included.
	///
	/// # Notes
	/// - Probabilities are not computed; call `update_probabilities`.
	/// - Uses an MPSC channel to collect partial tables from threads.
	pub fn from_lines(lines: &[String]) -> Self {
		if lines.is_empty() {
			return Self::new();
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = lines.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		for (index, chunk) in lines.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			thread::spawn(move || {
				let mut partial_table = TransitionTable::new();
				for sentence in &chunk {
					partial_table.add_sentence(sentence);
				}
				// The receiver is alive until every sender is dropped
				let _ = tx.send((index, partial_table));
			});
		}
		drop(tx);

		let mut partial_tables: Vec<(usize, TransitionTable)> = rx.iter().collect();
		partial_tables.sort_by_key(|(index, _)| *index);

		let mut table = TransitionTable::new();
		for (_, partial_table) in &partial_tables {
			table.merge(partial_table);
		}

		info!(
			"learned {} lines in {} chunks: {} tokens with outgoing transitions",
			lines.len(),
			partial_tables.len(),
			table.len()
		);
		table
	}

	/// Adds a line of text to the table.
	///
	/// The line is split on whitespace and case-folded; every pair of
	/// consecutive tokens is recorded with `add_pair`. An odd token count is
	/// padded with the terminator first, so the last word of such a line is
	/// paired with it. Even-length lines record no terminator edge.
	pub fn add_sentence(&mut self, sentence: &str) {
		let tokens = token::tokenize(sentence);
		for pair in tokens.windows(2) {
			self.add_pair(&pair[0], &pair[1]);
		}
	}

	/// Records that `second` was observed right after `first`.
	///
	/// Both tokens are case-folded. A blank `first` is ignored since the
	/// terminator has no outgoing transitions.
	pub fn add_pair(&mut self, first: &str, second: &str) {
		let first = token::fold(first);
		if token::is_terminator(&first) {
			debug!("ignoring transition from the terminator to {second:?}");
			return;
		}
		let second = token::fold(second);

		self.transitions.entry(first.clone()).or_default().record(&second);
		*self.totals.entry(first).or_insert(0) += 1;
	}

	/// Recomputes every probability as `count / total`.
	///
	/// Counts and order are untouched, so calling it again without new
	/// insertions yields the same values.
	pub fn update_probabilities(&mut self) {
		for (key, successors) in &mut self.transitions {
			// Every key has a total >= 1
			let total = self.totals.get(key).copied().unwrap_or_else(|| successors.count_sum());
			successors.normalize(total);
		}
	}

	/// Merges another table into this one.
	///
	/// Counts and totals are summed; successors unseen here are appended in
	/// `other`'s order. Probabilities must be recomputed afterwards.
	pub fn merge(&mut self, other: &Self) {
		for (key, successors) in &other.transitions {
			self.transitions.entry(key.clone()).or_default().absorb(successors);
		}
		for (key, total) in &other.totals {
			*self.totals.entry(key.clone()).or_insert(0) += *total;
		}
	}

	/// Successors of `token` (case-folded before lookup).
	pub fn successors(&self, token: &str) -> Option<&Successors> {
		self.transitions.get(&token::fold(token))
	}

	/// Total number of observations recorded for `token`.
	pub fn total(&self, token: &str) -> Option<usize> {
		self.totals.get(&token::fold(token)).copied()
	}

	/// Whether `token` has any outgoing transition.
	pub fn contains(&self, token: &str) -> bool {
		self.transitions.contains_key(&token::fold(token))
	}

	/// Tokens with outgoing transitions, in sorted order.
	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.transitions.keys().map(String::as_str)
	}

	/// Number of tokens with outgoing transitions.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	/// Whether nothing has been learned yet.
	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}
}
