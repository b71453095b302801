//! Seeded pseudo-random stream for reproducible bootstrap resampling
//!
//! Implements the 32-bit "mulberry32" mixer. All arithmetic is unsigned 32-bit
//! with explicit wraparound, so the same seed yields a bit-identical sequence
//! in every implementation of the scheme.
//!
//! A process-wide default generator is available through [`set_default_seed`]
//! and [`with_default_rng`]. It sits behind a `Mutex`; callers that need
//! reproducibility should own a [`RandomState`] instead.

use rand::{RngCore, SeedableRng};
use std::sync::{Mutex, MutexGuard};

/// Seed used by the default generator when [`set_default_seed`] was never called
pub const DEFAULT_SEED: u32 = 42;

const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic mulberry32 generator
///
/// # Example
/// ```
/// use evalcompare::stats::RandomState;
///
/// let mut rng = RandomState::new(7);
/// let first = rng.next_f64();
/// rng.reset();
/// assert_eq!(rng.next_f64(), first);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomState {
    seed: u32,
    state: u32,
}

impl RandomState {
    /// Create a generator from a 32-bit seed
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Rewind to the original seed
    pub fn reset(&mut self) {
        self.state = self.seed;
    }

    /// Next raw 32-bit output
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_raw()) / TWO_POW_32
    }

    /// Uniform index in `0..len` (`len` must be non-zero)
    pub fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len - 1)
    }
}

impl Default for RandomState {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RngCore for RandomState {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_raw());
        let lo = u64::from(self.next_raw());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for RandomState {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

static DEFAULT_RNG: Mutex<Option<RandomState>> = Mutex::new(None);

fn lock_default() -> MutexGuard<'static, Option<RandomState>> {
    // A panic while holding the lock cannot leave the generator half-updated.
    DEFAULT_RNG.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reseed the process-wide default generator
pub fn set_default_seed(seed: u32) {
    *lock_default() = Some(RandomState::new(seed));
    tracing::debug!(seed, "default RNG reseeded");
}

/// Run `f` with exclusive access to the process-wide default generator
///
/// The generator is created with [`DEFAULT_SEED`] on first use.
pub fn with_default_rng<T>(f: impl FnOnce(&mut RandomState) -> T) -> T {
    let mut guard = lock_default();
    let rng = guard.get_or_insert_with(RandomState::default);
    f(rng)
}
