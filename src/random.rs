//! Random sources for row resampling.
//!
//! Table operations that need randomness ([`LabeledTable::bootstrap`],
//! [`LabeledTable::randomize_rows`]) take the generator as `&mut R` and
//! never reach for a thread-local one. This module supplies a seeded
//! generator for callers and the row-index draws the bootstrap uses.
//!
//! [`LabeledTable::bootstrap`]: crate::LabeledTable::bootstrap
//! [`LabeledTable::randomize_rows`]: crate::LabeledTable::randomize_rows

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded `SmallRng`; the same seed replays the same resamples.
///
/// # Examples
/// ```
/// use u_table::random::create_rng;
/// use u_table::LabeledTable;
/// let t = LabeledTable::from_rows(&[[1.0], [2.0], [3.0]]).unwrap();
/// let a = t.bootstrap(&mut create_rng(9));
/// let b = t.bootstrap(&mut create_rng(9));
/// assert_eq!(a, b);
/// ```
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// `k` row indices drawn uniformly from `0..n` with replacement.
///
/// Empty when `n == 0`, since there is no row to draw.
pub fn draw_with_replacement<R: Rng>(n: usize, k: usize, rng: &mut R) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    (0..k).map(|_| rng.random_range(0..n)).collect()
}
