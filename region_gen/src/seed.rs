use std::hash::Hasher;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ComposerConfig;

/// A deterministic FNV-1a 64-bit hasher.
///
/// Used instead of `DefaultHasher` (which is randomized) so that seeds and
/// result fingerprints are stable across processes.
#[derive(Debug)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Stable seed for a map generated on world tile `tile` of world `world_name`.
pub fn seed_for_tile(world_name: &str, tile: u32) -> u64 {
    let mut hasher = FnvHasher::new();
    hasher.write(world_name.as_bytes());
    hasher.write(tile.to_string().as_bytes());
    hasher.finish()
}

/// Returns `seed` unchanged unless the config asks for true randomness, in
/// which case a fresh entropy-backed seed is drawn.
pub fn resolve_seed(config: &ComposerConfig, seed: u64) -> u64 {
    if config.true_random {
        ChaCha8Rng::from_entropy().next_u64()
    } else {
        seed
    }
}
