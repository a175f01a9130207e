//! Correlation IDs for request/response pairs.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Upper bound (exclusive) of the drawn number; seven decimal digits.
const ID_SPACE: u32 = 10_000_000;

/// Generates short IDs such as `0412-67` that tie a request block to its
/// response block.
///
/// IDs are drawn at random and are not unique. They only help a reader pair
/// up adjacent log lines.
#[derive(Debug)]
pub struct IdGenerator<R = StdRng> {
    rng: Mutex<R>,
}

impl IdGenerator<StdRng> {
    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a deterministic generator, for tests and reproducible output.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for IdGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> IdGenerator<R> {
    /// Creates a generator around an injected random source.
    #[must_use]
    pub const fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Draws the next ID.
    pub fn next_id(&self) -> String {
        let n = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.random_range(0..ID_SPACE)
        };
        format_id(n)
    }
}

/// Formats `n` as four digits, a hyphen, and the digits from the sixth on.
///
/// The fifth digit is dropped, so `1234567` becomes `1234-67`.
#[must_use]
pub fn format_id(n: u32) -> String {
    let padded = format!("{n:07}");
    format!("{}-{}", &padded[..4], &padded[5..])
}
