use rand::rngs::StdRng;

use crate::error::{MarkyError, Result};
use crate::model::random::RngSource;

/// Settings for sentence generation.
///
/// Both fields are optional; the default is an unbounded walk driven by an
/// OS-seeded generator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationConfig {
	/// Upper bound on the number of words in a generated sentence (seed
	/// included). `None` lets a walk run until it reaches the terminator,
	/// which may be never on a cyclic chain.
	pub max_words: Option<usize>,

	/// Seed for the random source. `None` seeds from the operating system.
	pub seed: Option<u64>,
}

impl GenerationConfig {
	/// Checks the settings.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `max_words` is zero.
	pub fn validate(&self) -> Result<()> {
		if self.max_words == Some(0) {
			return Err(MarkyError::InvalidConfig("max_words must be at least 1".to_owned()));
		}
		Ok(())
	}

	/// Builds the random source described by `seed`.
	pub fn random_source(&self) -> RngSource<StdRng> {
		RngSource::from_seed(self.seed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::random::RandomSource;

	#[test]
	fn default_is_unbounded_and_valid() {
		let config = GenerationConfig::default();
		assert_eq!(config.max_words, None);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn zero_max_words_is_rejected() {
		let config = GenerationConfig { max_words: Some(0), seed: None };
		assert!(matches!(config.validate(), Err(MarkyError::InvalidConfig(_))));
	}

	#[test]
	fn seeded_configs_share_a_sequence() {
		let config = GenerationConfig { max_words: None, seed: Some(7) };
		let mut left = config.random_source();
		let mut right = config.random_source();
		assert_eq!(left.next_f64(), right.next_f64());
	}
}
