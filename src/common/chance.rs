//! Injectable randomness for the simulated parts of the terminal.
//!
//! The card reader's occasional fault and the seeding of linked bank balances
//! both draw from a [`Chance`], so tests can pin the outcome with
//! [`FixedChance`] while the binary uses a [`SeededChance`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed values in `[0, 1)`.
pub trait Chance {
    fn roll(&mut self) -> f64;
}

impl<C: Chance + ?Sized> Chance for &mut C {
    fn roll(&mut self) -> f64 {
        (**self).roll()
    }
}

/// `StdRng`-backed chance, reproducible when built from a seed.
#[derive(Debug, Clone)]
pub struct SeededChance {
    rng: StdRng,
}

impl SeededChance {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl Chance for SeededChance {
    fn roll(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Always returns the same value.
///
/// `FixedChance(0.0)` makes every non-zero probability fire;
/// `FixedChance(0.99)` keeps small probabilities from ever firing.
#[derive(Debug, Clone, Copy)]
pub struct FixedChance(pub f64);

impl Chance for FixedChance {
    fn roll(&mut self) -> f64 {
        self.0
    }
}
