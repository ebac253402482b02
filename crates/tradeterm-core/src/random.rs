//! Injectable randomness for `/random_term`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform indices.
pub trait RandomSource: Send {
    /// Returns an index in `0..len`. Callers guarantee `len > 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Entropy-seeded [`StdRng`]; the production source.
pub struct StdRandomSource {
    rng: StdRng,
}

impl StdRandomSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for StdRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for StdRandomSource {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always returns the same index (clamped to the range).
#[derive(Debug, Clone, Copy)]
pub struct FixedRandomSource(pub usize);

impl RandomSource for FixedRandomSource {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_source_stays_in_range() {
        let mut source = StdRandomSource::new();
        for _ in 0..100 {
            assert!(source.pick_index(3) < 3);
        }
        assert_eq!(source.pick_index(1), 0);
    }

    #[test]
    fn test_fixed_source_clamps() {
        let mut source = FixedRandomSource(5);
        assert_eq!(source.pick_index(2), 1);
        assert_eq!(source.pick_index(10), 5);
    }
}
