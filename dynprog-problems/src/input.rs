//! Seeded random inputs for the sample workloads

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::ProblemError;

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Deterministic input source; the same seed always yields the same inputs.
#[derive(Debug, Clone)]
pub struct InputGenerator {
    seed: u64,
    rng: StdRng,
}

impl InputGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator with a fresh random seed. The seed is logged so a run can
    /// be reproduced.
    pub fn from_random_seed() -> Self {
        let seed: u64 = rand::random();
        info!(seed, "seed for random input generation");
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Independent generator for the `index`-th input of a batch.
    ///
    /// Forks depend only on the seed and `index`, not on what was drawn from
    /// `self`, so batches can be generated in parallel.
    pub fn fork(&self, index: u64) -> Self {
        Self::new(StdRng::seed_from_u64(self.seed ^ index).random())
    }

    /// `len` lowercase ASCII letters
    pub fn random_string(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(ALPHABET[self.rng.random_range(0..ALPHABET.len())]))
            .collect()
    }

    /// Random string with a length in `min..max`.
    ///
    /// # Returns
    /// * `Err(ProblemError::InvalidRange)` - `min >= max`
    pub fn random_string_between(&mut self, min: usize, max: usize) -> Result<String, ProblemError> {
        if min >= max {
            return Err(ProblemError::InvalidRange { min, max });
        }
        let len = self.rng.random_range(min..max);
        Ok(self.random_string(len))
    }

    /// `len` values drawn from `[-len, len)`
    pub fn random_array(&mut self, len: usize) -> Vec<i64> {
        let bound = len as i64;
        (0..len)
            .map(|_| self.rng.random_range(-bound..bound))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_inputs() {
        let mut a = InputGenerator::new(7);
        let mut b = InputGenerator::new(7);
        assert_eq!(a.random_string(20), b.random_string(20));
        assert_eq!(a.random_array(20), b.random_array(20));
    }

    #[test]
    fn test_random_string_alphabet() {
        let text = InputGenerator::new(1).random_string(500);
        assert_eq!(text.len(), 500);
        assert!(text.bytes().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_random_array_bounds() {
        let values = InputGenerator::new(2).random_array(50);
        assert_eq!(values.len(), 50);
        assert!(values.iter().all(|&v| (-50..50).contains(&v)));
        assert!(InputGenerator::new(2).random_array(0).is_empty());
    }

    #[test]
    fn test_string_between() {
        let mut generator = InputGenerator::new(3);
        for _ in 0..100 {
            let len = generator.random_string_between(4, 9).unwrap().len();
            assert!((4..9).contains(&len));
        }
        assert_eq!(
            generator.random_string_between(5, 5),
            Err(ProblemError::InvalidRange { min: 5, max: 5 })
        );
    }

    #[test]
    fn test_forks_are_stable_and_distinct() {
        let parent = InputGenerator::new(11);
        let mut drained = parent.clone();
        drained.random_array(100);

        assert_eq!(parent.fork(3).seed(), drained.fork(3).seed());
        assert_ne!(parent.fork(3).seed(), parent.fork(4).seed());
        assert_ne!(parent.fork(0).seed(), InputGenerator::new(12).fork(0).seed());

        let mut a = parent.fork(5);
        let mut b = InputGenerator::new(11).fork(5);
        assert_eq!(a.random_string(30), b.random_string(30));
        assert_ne!(parent.fork(5).random_array(30), parent.fork(6).random_array(30));
    }
}
