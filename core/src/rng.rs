//! Deterministic random number generation.
//!
//! RULE: Nothing in the pipeline may call any platform RNG.
//! All randomness flows through a RandomSource handed in by the caller.
//!
//! A session derives one stream per generate call from its master seed:
//!   - The k-th generation of a session is reproducible in isolation.
//!   - Every sample consumes exactly one `next_f64` draw, so tests can
//!     script a generation with a fixed list of floats.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::types::Generation;

/// Uniform sampling over a stream of floats in [0.0, 1.0).
pub trait RandomSource {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Roll a float in [min, max).
    fn range(&mut self, min: f64, max: f64) -> f64 {
        self.next_f64() * (max - min) + min
    }

    /// Roll an index in [0, n). `n` must be > 0.
    fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// A named, seeded PCG stream.
pub struct SeededRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }
}

impl RandomSource for SeededRng {
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// Every draw must lie in [0.0, 1.0). Panics on an empty script.
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "script must contain at least one draw");
        Self { draws, cursor: 0 }
    }

    /// How many draws have been consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}

/// Derives one independent stream per generation from a master seed.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The stream for one generate call. The mapping must never change,
    /// or every recorded session stops replaying.
    pub fn for_generation(&self, generation: Generation) -> SeededRng {
        let derived_seed = self.master_seed ^ generation.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        SeededRng::new(derived_seed).with_name("generation")
    }
}
