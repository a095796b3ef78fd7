//! Dense input vector generation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{try_with_capacity, Result};

/// Creates the generator for a run: seeded when `seed` is given, from entropy otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Returns `len` values drawn uniformly from `[0, 1)`
pub fn generate_vector<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Result<Vec<f32>> {
    let mut v = try_with_capacity("input vector", len)?;
    v.extend((0..len).map(|_| rng.gen::<f32>()));
    Ok(v)
}
