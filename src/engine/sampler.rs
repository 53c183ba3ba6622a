//! Weighted, duplicate-free combination sampling.
//!
//! Picks are uniform over the pool's entries, so a number's chance per
//! pick is proportional to how many times it appears. Repeated picks of a
//! number already in the combination are discarded.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::types::{Combination, Pool, Result, SurpresinhaError, COUNT_BOUNDS};

/// Picks allowed per combination before giving up.
pub const MAX_ATTEMPTS_PER_COMBINATION: usize = 10_000;

// ---------------------------------------------------------------------------
// Random source
// ---------------------------------------------------------------------------

/// Caller-owned pseudorandom generator.
///
/// Seeded sources replay the exact same sequence of combinations.
/// Reproducibility is the goal here, not unpredictability.
pub struct RandomSource {
    rng: StdRng,
    seed: Option<u64>,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn pick(&mut self, numbers: &[u8]) -> Option<u8> {
        numbers.choose(&mut self.rng).copied()
    }
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource").field("seed", &self.seed).finish()
    }
}

/// Seeded source when `seed` is given, entropy-seeded otherwise.
pub fn apply_seed(seed: Option<u64>) -> RandomSource {
    match seed {
        Some(s) => RandomSource::seeded(s),
        None => RandomSource::from_entropy(),
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Draw `count` combinations of `size` distinct numbers from `pool`.
///
/// Fails with `InvalidInput` for an empty pool or bounds outside the
/// pool's game, and with `ExhaustedAttempts` when a combination cannot be
/// completed within [`MAX_ATTEMPTS_PER_COMBINATION`] picks.
pub fn draw_combinations(
    count: usize,
    size: usize,
    pool: &Pool,
    rng: &mut RandomSource,
) -> Result<Vec<Combination>> {
    let game = pool.game();

    if pool.is_empty() {
        return Err(SurpresinhaError::InvalidInput("pool is empty".into()));
    }
    if !COUNT_BOUNDS.contains(&count) {
        return Err(SurpresinhaError::InvalidInput(format!(
            "number of combinations must be between {} and {}, got {count}",
            COUNT_BOUNDS.start(),
            COUNT_BOUNDS.end()
        )));
    }
    let bounds = game.size_bounds();
    if !bounds.contains(&size) {
        return Err(SurpresinhaError::InvalidInput(format!(
            "{game}: numbers per combination must be between {} and {}, got {size}",
            bounds.start(),
            bounds.end()
        )));
    }

    let combinations = (0..count)
        .map(|_| draw_one(size, pool.numbers(), rng))
        .collect::<Result<Vec<_>>>()?;

    debug!(game = %game, count, size, pool_len = pool.len(), "Combinations drawn");
    Ok(combinations)
}

fn draw_one(size: usize, numbers: &[u8], rng: &mut RandomSource) -> Result<Combination> {
    let mut chosen: Vec<u8> = Vec::with_capacity(size);
    let mut attempts = 0usize;

    while chosen.len() < size {
        attempts += 1;
        if attempts > MAX_ATTEMPTS_PER_COMBINATION {
            return Err(SurpresinhaError::ExhaustedAttempts {
                size,
                attempts: MAX_ATTEMPTS_PER_COMBINATION,
            });
        }
        let Some(n) = rng.pick(numbers) else {
            return Err(SurpresinhaError::InvalidInput("pool is empty".into()));
        };
        if !chosen.contains(&n) {
            chosen.push(n);
        }
    }

    Ok(Combination::from_distinct(chosen))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
