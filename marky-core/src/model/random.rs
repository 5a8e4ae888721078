use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`.
///
/// The chain takes one at construction instead of reaching for a global
/// generator, so sampling can be made reproducible or fully scripted.
pub trait RandomSource {
	/// Draws the next value in `[0, 1)`.
	fn next_f64(&mut self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
	fn next_f64(&mut self) -> f64 {
		(**self).next_f64()
	}
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
	fn next_f64(&mut self) -> f64 {
		(**self).next_f64()
	}
}

/// `RandomSource` backed by any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R> {
	rng: R,
}

impl<R: Rng> RngSource<R> {
	pub fn new(rng: R) -> Self {
		Self { rng }
	}
}

impl RngSource<StdRng> {
	/// Seeds a `StdRng` from the operating system.
	pub fn from_os() -> Self {
		Self::new(StdRng::from_os_rng())
	}

	/// Seeds a `StdRng` with a fixed value; identical seeds replay identical draws.
	pub fn seeded(seed: u64) -> Self {
		Self::new(StdRng::seed_from_u64(seed))
	}

	/// `seeded` when a seed is given, `from_os` otherwise.
	pub fn from_seed(seed: Option<u64>) -> Self {
		match seed {
			Some(seed) => Self::seeded(seed),
			None => Self::from_os(),
		}
	}
}

impl<R: Rng> RandomSource for RngSource<R> {
	fn next_f64(&mut self) -> f64 {
		self.rng.random::<f64>()
	}
}

/// Replays a fixed list of draws, starting over once exhausted.
///
/// An empty script always draws `0.0`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
	values: Vec<f64>,
	cursor: usize,
}

impl ScriptedRandom {
	pub fn new(values: impl Into<Vec<f64>>) -> Self {
		Self { values: values.into(), cursor: 0 }
	}

	/// Number of values drawn so far.
	pub fn draws(&self) -> usize {
		self.cursor
	}
}

impl RandomSource for ScriptedRandom {
	fn next_f64(&mut self) -> f64 {
		if self.values.is_empty() {
			return 0.0;
		}
		let value = self.values[self.cursor % self.values.len()];
		self.cursor += 1;
		value
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scripted_values_loop() {
		let mut random = ScriptedRandom::new([0.1, 0.9]);
		let drawn: Vec<f64> = (0..5).map(|_| random.next_f64()).collect();
		assert_eq!(drawn, vec![0.1, 0.9, 0.1, 0.9, 0.1]);
		assert_eq!(random.draws(), 5);
	}

	#[test]
	fn empty_script_draws_zero() {
		let mut random = ScriptedRandom::default();
		assert_eq!(random.next_f64(), 0.0);
	}

	#[test]
	fn seeded_sources_replay() {
		let mut left = RngSource::seeded(42);
		let mut right = RngSource::seeded(42);
		for _ in 0..100 {
			let value = left.next_f64();
			assert!((0.0..1.0).contains(&value));
			assert_eq!(value, right.next_f64());
		}
	}

	#[test]
	fn borrowed_sources_advance_the_owner() {
		fn draw(mut source: impl RandomSource) -> f64 {
			source.next_f64()
		}

		let mut random = ScriptedRandom::new([0.25, 0.75]);
		assert_eq!(draw(&mut random), 0.25);
		assert_eq!(random.next_f64(), 0.75);
	}
}
