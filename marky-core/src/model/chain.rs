use std::fmt;
use std::path::Path;

use log::{debug, warn};
use rand::rngs::StdRng;

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::io::read_file;
use super::random::{RandomSource, RngSource};
use super::successors::Successors;
use super::table::TransitionTable;
use super::token::{self, TERMINATOR};

/// Word-level Markov chain with its own random source.
///
/// # Responsibilities
/// - Learn transitions from sentences or explicit pairs
/// - Normalize counts into probabilities on request
/// - Sample successors and generate sentences by random walk
///
/// # Lifecycle
/// Sentences are added first, then `update_probabilities` is called, then
/// words and sentences are generated. Probabilities are not refreshed by
/// insertions: generating from a table that was never (or not recently)
/// normalized samples from stale values. Fresh entries carry a probability
/// of `0.0`, which makes sampling fall through to the terminator.
pub struct Chain<R = RngSource<StdRng>> {
	table: TransitionTable,
	random: R,
}

impl Chain {
	/// Creates an empty chain driven by an OS-seeded generator.
	pub fn new() -> Self {
		Self::with_random(RngSource::from_os())
	}
}

impl Default for Chain {
	fn default() -> Self {
		Self::new()
	}
}

impl<R: RandomSource> Chain<R> {
	/// Creates an empty chain drawing from `random`.
	pub fn with_random(random: R) -> Self {
		Self::from_table(TransitionTable::new(), random)
	}

	/// Wraps an existing table. Its probabilities are used as they are.
	pub fn from_table(table: TransitionTable, random: R) -> Self {
		Self { table, random }
	}

	/// Learns every line in parallel, then normalizes.
	pub fn from_lines(lines: &[String], random: R) -> Self {
		let mut chain = Self::from_table(TransitionTable::from_lines(lines), random);
		chain.update_probabilities();
		chain
	}

	/// Reads a text file and learns one sentence per line, then normalizes.
	///
	/// # Errors
	/// Returns an error if the file cannot be read.
	pub fn from_file<P: AsRef<Path>>(filepath: P, random: R) -> Result<Self> {
		let lines = read_file(filepath)?;
		Ok(Self::from_lines(&lines, random))
	}

	/// Read access to the learned transitions.
	pub fn table(&self) -> &TransitionTable {
		&self.table
	}

	/// The random source, e.g. to inspect a scripted one.
	pub fn random(&self) -> &R {
		&self.random
	}

	/// Adds a line of text. See `TransitionTable::add_sentence`.
	pub fn add_sentence(&mut self, sentence: &str) {
		self.table.add_sentence(sentence);
	}

	/// Records that `second` followed `first`. See `TransitionTable::add_pair`.
	pub fn add_pair(&mut self, first: &str, second: &str) {
		self.table.add_pair(first, second);
	}

	/// Recomputes every probability from the current counts.
	pub fn update_probabilities(&mut self) {
		self.table.update_probabilities();
	}

	/// Successors of `token`, if it has any.
	pub fn successors(&self, token: &str) -> Option<&Successors> {
		self.table.successors(token)
	}

	/// Chooses the word following `token`.
	///
	/// - Unknown tokens yield the terminator without drawing.
	/// - Buckets of exactly two successors are split 50/50, whatever their
	///   counts.
	/// - Otherwise one value `t` is drawn and the first successor whose
	///   cumulative probability reaches `t` wins. If rounding (or missing
	///   normalization) keeps the running sum below `t`, the terminator is
	///   returned.
	pub fn next_word(&mut self, token: &str) -> String {
		let Some(successors) = self.table.successors(token) else {
			debug!("no transitions from {token:?}");
			return TERMINATOR.to_owned();
		};

		let test = self.random.next_f64();

		if successors.len() == 2 {
			let chosen = if test <= 0.5 { successors.first() } else { successors.last() };
			return chosen.map(|entry| entry.token().to_owned()).unwrap_or_default();
		}

		let mut total = 0.0;
		for entry in successors.iter() {
			total += entry.probability();
			if total >= test {
				return entry.token().to_owned();
			}
		}

		debug!("cumulative probability {total} from {token:?} never reached {test}");
		TERMINATOR.to_owned()
	}

	/// Generates a sentence starting with `start`.
	///
	/// Words are chained with `next_word` and joined with single spaces until
	/// the terminator comes up. There is no length limit: a chain with a
	/// likely cycle can produce very long sentences or never return. Use
	/// `generate_sentence_with` to cap the length.
	pub fn generate_sentence(&mut self, start: &str) -> String {
		self.walk(start, None)
	}

	/// Generates a sentence, stopping at `config.max_words` words if set.
	///
	/// # Errors
	/// Returns an error if the configuration is invalid.
	pub fn generate_sentence_with(&mut self, start: &str, config: &GenerationConfig) -> Result<String> {
		config.validate()?;
		Ok(self.walk(start, config.max_words))
	}

	fn walk(&mut self, start: &str, max_words: Option<usize>) -> String {
		let mut words = vec![start.trim().to_owned()];
		let mut word = self.next_word(start);

		while !token::is_terminator(&word) {
			if max_words.is_some_and(|max| words.len() >= max) {
				warn!("sentence from {start:?} stopped at {} words", words.len());
				break;
			}
			let next = self.next_word(&word);
			words.push(word);
			word = next;
		}

		words.join(" ")
	}

	/// Picks a token uniformly among those with outgoing transitions.
	///
	/// These are not known sentence openers, just words that were followed
	/// by something. Returns `None` if nothing has been learned.
	pub fn random_starting_word(&mut self) -> Option<String> {
		let len = self.table.len();
		if len == 0 {
			return None;
		}
		let index = ((self.random.next_f64() * len as f64) as usize).min(len - 1);
		self.table.tokens().nth(index).map(str::to_owned)
	}
}

impl<R> fmt::Debug for Chain<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Chain").field("table", &self.table).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::random::ScriptedRandom;

	fn scripted(values: &[f64]) -> Chain<ScriptedRandom> {
		Chain::with_random(ScriptedRandom::new(values.to_vec()))
	}

	/// "x" -> p (0.5), q (0.25), r (0.25)
	fn three_way(values: &[f64]) -> Chain<ScriptedRandom> {
		let mut chain = scripted(values);
		chain.add_pair("x", "p");
		chain.add_pair("x", "p");
		chain.add_pair("x", "q");
		chain.add_pair("x", "r");
		chain.update_probabilities();
		chain
	}

	#[test]
	fn cumulative_sampling_follows_stored_order() {
		let mut chain = three_way(&[0.1, 0.5, 0.6, 0.75, 0.9, 0.0]);
		let drawn: Vec<String> = (0..6).map(|_| chain.next_word("x")).collect();
		assert_eq!(drawn, vec!["p", "p", "q", "q", "r", "p"]);
	}

	#[test]
	fn sampling_is_case_insensitive() {
		let mut chain = three_way(&[0.9]);
		assert_eq!(chain.next_word("X"), "r");
	}

	#[test]
	fn unknown_tokens_terminate_without_drawing() {
		let mut chain = three_way(&[0.9, 0.1]);
		assert_eq!(chain.next_word("nowhere"), TERMINATOR);
		assert_eq!(chain.random().draws(), 0);
		assert_eq!(chain.next_word("x"), "r");
	}

	#[test]
	fn two_successors_split_evenly() {
		let mut chain = scripted(&[0.2, 0.5, 0.51, 0.99]);
		for _ in 0..9 {
			chain.add_pair("y", "often");
		}
		chain.add_pair("y", "rarely");
		chain.update_probabilities();

		let drawn: Vec<String> = (0..4).map(|_| chain.next_word("y")).collect();
		assert_eq!(drawn, vec!["often", "often", "rarely", "rarely"]);
	}

	#[test]
	fn unnormalized_buckets_fall_through_to_the_terminator() {
		let mut chain = scripted(&[0.3, 0.0]);
		chain.add_pair("x", "p");
		chain.add_pair("x", "q");
		chain.add_pair("x", "r");

		assert_eq!(chain.next_word("x"), TERMINATOR);
		assert_eq!(chain.next_word("x"), "p");
	}

	#[test]
	fn rounding_shortfall_returns_the_terminator() {
		// Largest value below 1.0
		let draw = 1.0 - f64::EPSILON / 2.0;
		let mut chain = scripted(&[draw]);
		for token in ["a", "b", "c", "d", "e", "f", "g"] {
			chain.add_pair("w", token);
		}
		chain.update_probabilities();

		// Seven sevenths accumulate to 0.9999999999999998
		let reached: f64 = chain.successors("w").map(Successors::probability_sum).unwrap_or_default();
		assert!(reached < draw);

		assert_eq!(chain.next_word("w"), TERMINATOR);
		assert_eq!(chain.random().draws(), 1);
	}

	#[test]
	fn generation_stops_at_the_terminator() {
		let mut chain = scripted(&[0.3]);
		chain.add_sentence("The quick fox");
		chain.update_probabilities();

		assert_eq!(chain.generate_sentence("The"), "The quick fox");
	}

	#[test]
	fn generation_from_an_unknown_word_is_the_word() {
		let mut chain = scripted(&[0.3]);
		chain.add_sentence("The quick fox");
		chain.update_probabilities();

		assert_eq!(chain.generate_sentence("zebra"), "zebra");
		assert_eq!(chain.generate_sentence(""), "");
	}

	#[test]
	fn generation_before_normalization_stops_early() {
		let mut chain = scripted(&[0.3]);
		chain.add_sentence("The quick fox");

		assert_eq!(chain.generate_sentence("the"), "the");
	}

	#[test]
	fn max_words_caps_cycles() {
		let mut chain = scripted(&[0.5]);
		chain.add_pair("again", "again");
		chain.update_probabilities();

		let config = GenerationConfig { max_words: Some(4), seed: None };
		let sentence = chain.generate_sentence_with("again", &config).unwrap();
		assert_eq!(sentence, "again again again again");
	}

	#[test]
	fn invalid_config_is_reported() {
		let mut chain = scripted(&[0.5]);
		let config = GenerationConfig { max_words: Some(0), seed: None };
		assert!(chain.generate_sentence_with("a", &config).is_err());
	}

	#[test]
	fn random_starting_word_is_a_key() {
		let mut chain = scripted(&[0.0, 0.5, 0.999]);
		assert_eq!(chain.random_starting_word(), None);

		chain.add_sentence("b c");
		chain.add_sentence("a c");
		chain.add_sentence("d c");

		// keys in order: a, b, d
		assert_eq!(chain.random_starting_word().as_deref(), Some("a"));
		assert_eq!(chain.random_starting_word().as_deref(), Some("b"));
		assert_eq!(chain.random_starting_word().as_deref(), Some("d"));
	}

	#[test]
	fn seeded_chains_generate_identically() {
		let lines: Vec<String> = ["the cat sat on the mat", "the dog sat on the cat", "a cat ran"]
			.iter()
			.map(|line| line.to_string())
			.collect();

		let config = GenerationConfig { max_words: Some(50), seed: Some(3) };
		let mut left = Chain::from_lines(&lines, config.random_source());
		let mut right = Chain::from_lines(&lines, config.random_source());

		for _ in 0..10 {
			assert_eq!(
				left.generate_sentence_with("the", &config).unwrap(),
				right.generate_sentence_with("the", &config).unwrap()
			);
		}
	}
}
