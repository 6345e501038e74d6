//! Randomized inter-iteration delays.
//!
//! The extraction loop sleeps a jittered delay between iterations so the
//! request cadence does not look mechanical. The source is swappable: tests
//! use a fixed seed or [`FixedDelay`] to keep iteration timing deterministic.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of delays within inclusive `[min_ms, max_ms]` bounds.
pub trait Jitter: Send {
    fn next_delay(&mut self, min_ms: u64, max_ms: u64) -> Duration;
}

/// Uniform delays from a seedable PRNG.
#[derive(Debug, Clone)]
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is set, OS-seeded otherwise.
    #[must_use]
    pub fn from_config(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os_rng, Self::from_seed)
    }
}

impl Jitter for SeededJitter {
    fn next_delay(&mut self, min_ms: u64, max_ms: u64) -> Duration {
        let (lo, hi) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            (max_ms, min_ms)
        };
        Duration::from_millis(self.rng.random_range(lo..=hi))
    }
}

/// Always the same delay, ignoring the bounds.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Jitter for FixedDelay {
    fn next_delay(&mut self, _min_ms: u64, _max_ms: u64) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_stay_within_bounds() {
        let mut jitter = SeededJitter::from_seed(7);
        for _ in 0..200 {
            let d = jitter.next_delay(800, 2_000);
            assert!(d >= Duration::from_millis(800) && d <= Duration::from_millis(2_000));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededJitter::from_seed(42);
        let mut b = SeededJitter::from_seed(42);
        let xs: Vec<_> = (0..10).map(|_| a.next_delay(0, 10_000)).collect();
        let ys: Vec<_> = (0..10).map(|_| b.next_delay(0, 10_000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn equal_bounds_give_exact_delay() {
        let mut jitter = SeededJitter::from_config(Some(1));
        assert_eq!(jitter.next_delay(500, 500), Duration::from_millis(500));
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let mut jitter = SeededJitter::from_seed(3);
        let d = jitter.next_delay(900, 100);
        assert!(d >= Duration::from_millis(100) && d <= Duration::from_millis(900));
    }

    #[test]
    fn fixed_delay_ignores_bounds() {
        let mut fixed = FixedDelay(Duration::from_millis(5));
        assert_eq!(fixed.next_delay(800, 2_000), Duration::from_millis(5));
    }
}
