use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use std::ops::Range;

/// Uniform random integers drawn from a half open range
pub struct RandomNumbers {
  rng: StdRng,
  range: Range<i32>,
}

impl RandomNumbers {
  /// Seeds from `seed` when given, otherwise from system entropy
  pub fn new(range: Range<i32>, seed: Option<u64>) -> Self {
    let rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    RandomNumbers { rng, range }
  }

  pub fn range(&self) -> &Range<i32> {
    &self.range
  }

  pub fn draw(&mut self) -> i32 {
    self.rng.gen_range(self.range.clone())
  }
}
