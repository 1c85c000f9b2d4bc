//! Slice-level numerics shared by the table engines.
//!
//! Everything here works on plain `&[f64]` and knows nothing about labels.
//!
//! # Algorithms
//!
//! - **Sums**: Neumaier compensated summation, both as a one-shot
//!   [`kahan_sum`] and as the streaming [`CompensatedSum`] used for long
//!   dot products.
//! - **Variance/StdDev**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Quantile**: Hazen linear interpolation (`place = q·n + ½`), clamped to
//!   the extreme order statistics.
//!   Reference: Hyndman & Fan (1996), "Sample Quantiles in Statistical
//!   Packages", *The American Statistician* 50(4), definition 5.
//! - **Ranks**: fractional ranking, ties share the mean of their ranks.

// ---------------------------------------------------------------------------
// Compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
///
/// # Examples
/// ```
/// use u_table::stats::kahan_sum;
/// assert_eq!(kahan_sum(&[1.0, 1e100, 1.0, -1e100]), 2.0);
/// ```
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut acc = CompensatedSum::new();
    for &x in data {
        acc.add(x);
    }
    acc.value()
}

/// Streaming Neumaier accumulator.
///
/// Carries a running compensation term next to the sum so that the low
/// order bits lost in each addition are recovered when the value is read.
/// Used wherever a long reduction is narrowed to a single `f64` at the end
/// (dot products, grand sums).
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensatedSum {
    sum: f64,
    c: f64,
}

impl CompensatedSum {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self { sum: 0.0, c: 0.0 }
    }

    /// Adds one term.
    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.c += (self.sum - t) + x;
        } else {
            self.c += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// Returns the compensated total.
    pub fn value(&self) -> f64 {
        self.sum + self.c
    }
}

/// Compensated dot product of two equally long slices.
///
/// Extra elements of the longer slice are ignored.
pub fn dot(x: &[f64], y: &[f64]) -> f64 {
    let mut acc = CompensatedSum::new();
    for (a, b) in x.iter().zip(y) {
        acc.add(a * b);
    }
    acc.value()
}

/// Euclidean (L2) norm with compensated accumulation of the squares.
pub fn l2_norm(data: &[f64]) -> f64 {
    dot(data, data).sqrt()
}

// ---------------------------------------------------------------------------
// Location and spread
// ---------------------------------------------------------------------------

/// Arithmetic mean using compensated summation.
///
/// # Returns
/// - `None` if `data` is empty.
///
/// # Examples
/// ```
/// use u_table::stats::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Sample standard deviation (n − 1 denominator).
///
/// # Returns
/// - `None` if `data.len() < 2`.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let mut acc = WelfordAccumulator::new();
    for &x in data {
        acc.update(x);
    }
    acc.sample_std_dev()
}

/// Streaming accumulator for mean and variance (Welford).
///
/// # Examples
/// ```
/// use u_table::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.sample_variance().unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean_acc: 0.0,
            m2: 0.0,
        }
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean_acc = value;
            return;
        }
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    /// Number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean, or `None` before the first sample.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean_acc)
    }

    /// Sample variance (n − 1), or `None` with fewer than 2 samples.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Sample standard deviation, or `None` with fewer than 2 samples.
    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

// ---------------------------------------------------------------------------
// Order statistics
// ---------------------------------------------------------------------------

/// Returns a sorted copy of `data` in IEEE total order (NaN after `+∞`).
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut v = data.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Quantile of **pre-sorted** data by Hazen interpolation.
///
/// For sorted `x[0..n]` and fraction `q`:
/// 1. `place = q·n + ½` (1-based position)
/// 2. below position 1 return `x[0]`, above position `n` return `x[n−1]`
/// 3. otherwise interpolate linearly between the two neighbours
///
/// # Returns
/// - `None` if `sorted_data` is empty or `q` is outside `[0, 1]`.
///
/// # Examples
/// ```
/// use u_table::stats::quantile_sorted;
/// assert_eq!(quantile_sorted(&[1.0, 2.0, 3.0, 4.0], 0.5), Some(2.5));
/// assert_eq!(quantile_sorted(&[1.0, 2.0, 3.0, 4.0], 0.0), Some(1.0));
/// ```
pub fn quantile_sorted(sorted_data: &[f64], q: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 || !(0.0..=1.0).contains(&q) {
        return None;
    }
    if n == 1 {
        return Some(sorted_data[0]);
    }
    let place = q * n as f64 + 0.5;
    if place <= 1.0 {
        return Some(sorted_data[0]);
    }
    if place >= n as f64 {
        return Some(sorted_data[n - 1]);
    }
    let left = place.floor() as usize; // 1-based, in [1, n-1]
    let g = place - left as f64;
    let lo = sorted_data[left - 1];
    let hi = sorted_data[left];
    Some(lo + g * (hi - lo))
}

/// Quantile of unsorted data; sorts a copy first.
///
/// # Returns
/// - `None` if `data` is empty or `q` is outside `[0, 1]`.
pub fn quantile(data: &[f64], q: f64) -> Option<f64> {
    if data.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    quantile_sorted(&sorted(data), q)
}

/// Median of unsorted data.
///
/// # Examples
/// ```
/// use u_table::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    quantile(data, 0.5)
}

/// Fractional (1-based) ranks of `data`.
///
/// Tied values receive the mean of the ranks they jointly occupy, so
/// `[3, 1, 3, 2]` ranks as `[3.5, 1, 3.5, 2]`.
///
/// # Examples
/// ```
/// use u_table::stats::fractional_ranks;
/// assert_eq!(fractional_ranks(&[3.0, 1.0, 3.0, 2.0]), vec![3.5, 1.0, 3.5, 2.0]);
/// ```
pub fn fractional_ranks(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && data[order[end]] == data[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1 ..= end
        let shared = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = shared;
        }
        start = end;
    }
    ranks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-1e6_f64..1e6, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn ranks_sum_to_triangular_number(data in finite_vec(0, 60)) {
            let n = data.len() as f64;
            let total: f64 = fractional_ranks(&data).iter().sum();
            prop_assert!((total - n * (n + 1.0) / 2.0).abs() < 1e-9);
        }

        #[test]
        fn quantile_within_range(data in finite_vec(1, 60), q in 0.0_f64..=1.0) {
            let v = quantile(&data, q).unwrap();
            let lo = data.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(v >= lo && v <= hi);
        }

        #[test]
        fn quantiles_monotonic(data in finite_vec(2, 60), p1 in 0.0_f64..=1.0, p2 in 0.0_f64..=1.0) {
            let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
            prop_assert!(quantile(&data, lo).unwrap() <= quantile(&data, hi).unwrap() + 1e-12);
        }

        #[test]
        fn welford_matches_two_pass(data in finite_vec(2, 80)) {
            let m = mean(&data).unwrap();
            let ss: f64 = data.iter().map(|x| (x - m) * (x - m)).sum();
            let two_pass = (ss / (data.len() - 1) as f64).sqrt();
            let sd = std_dev(&data).unwrap();
            prop_assert!((sd - two_pass).abs() <= 1e-6 * two_pass.max(1.0));
        }
    }
}
