//! Generation engine.
//!
//! The pool builder turns draw history into a weighted pool (with tiered
//! fallback); the sampler turns a pool into combinations.

pub mod builder;
pub mod sampler;

pub use builder::PoolBuilder;
pub use sampler::{apply_seed, draw_combinations, RandomSource};
