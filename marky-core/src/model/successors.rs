use serde::{Deserialize, Serialize};

/// One observed successor of a token.
///
/// `probability` is only meaningful after the owning table has been
/// normalized; until then it holds `0.0` (new entry) or the value of the
/// previous normalization.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SuccessorEntry {
	token: String,
	count: usize,
	probability: f64,
}

impl SuccessorEntry {
	fn new(token: &str) -> Self {
		Self {
			token: token.to_owned(),
			count: 1,
			probability: 0.0,
		}
	}

	/// The successor token (case-folded, `""` for the terminator).
	pub fn token(&self) -> &str {
		&self.token
	}

	/// How many times this successor was observed.
	pub fn count(&self) -> usize {
		self.count
	}

	/// `count / total` as of the last normalization.
	pub fn probability(&self) -> f64 {
		self.probability
	}
}

/// Successors of a single token, in first-seen order.
///
/// ## Invariants
/// - Tokens are unique within the list
/// - Every count is >= 1
/// - Order is insertion order and never changes (sampling breaks ties by it)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Successors {
	entries: Vec<SuccessorEntry>,
}

impl Successors {
	/// Records one more observation of `token`.
	///
	/// - If the token is already listed, its count is increased.
	/// - Otherwise it is appended with a count of 1.
	pub(crate) fn record(&mut self, token: &str) {
		match self.entries.iter_mut().find(|entry| entry.token == token) {
			Some(entry) => entry.count += 1,
			None => self.entries.push(SuccessorEntry::new(token)),
		}
	}

	/// Adds the counts of `other` into this list.
	///
	/// Unseen tokens are appended in `other`'s order. Probabilities are left
	/// untouched and must be recomputed.
	pub(crate) fn absorb(&mut self, other: &Self) {
		for incoming in &other.entries {
			match self.entries.iter_mut().find(|entry| entry.token == incoming.token) {
				Some(entry) => entry.count += incoming.count,
				None => {
					let mut entry = SuccessorEntry::new(&incoming.token);
					entry.count = incoming.count;
					self.entries.push(entry);
				}
			}
		}
	}

	/// Sets every probability to `count / total`.
	pub(crate) fn normalize(&mut self, total: usize) {
		let total = total as f64;
		for entry in &mut self.entries {
			entry.probability = entry.count as f64 / total;
		}
	}

	/// Looks up the entry for an already case-folded token.
	pub fn get(&self, token: &str) -> Option<&SuccessorEntry> {
		self.entries.iter().find(|entry| entry.token == token)
	}

	/// Iterates over the entries in first-seen order.
	pub fn iter(&self) -> impl Iterator<Item = &SuccessorEntry> {
		self.entries.iter()
	}

	/// Number of distinct successors.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether no successor was recorded yet.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The earliest recorded successor.
	pub fn first(&self) -> Option<&SuccessorEntry> {
		self.entries.first()
	}

	/// The most recently added successor.
	pub fn last(&self) -> Option<&SuccessorEntry> {
		self.entries.last()
	}

	/// Sum of all counts.
	pub fn count_sum(&self) -> usize {
		self.entries.iter().map(|entry| entry.count).sum()
	}

	/// Sum of all probabilities.
	pub fn probability_sum(&self) -> f64 {
		self.entries.iter().map(|entry| entry.probability).sum()
	}
}
