//! BHEP test for multivariate normality.
//!
//! The table is read as `n` samples (rows) of `p` variables (columns).
//! The Baringhaus–Henze–Epps–Pulley statistic compares the empirical
//! characteristic function of the whitened sample with the standard normal
//! one under a Gaussian weight of width `β`. Its null distribution is
//! approximated by a log-normal law with matching mean and variance, and
//! the p-value is that law's upper tail at the observed statistic.
//!
//! Reference: Henze & Wagner (1997), "A New Approach to the BHEP Tests for
//! Multivariate Normality", *Journal of Multivariate Analysis* 62(1).

use std::f64::consts::FRAC_1_SQRT_2;

use nalgebra::DVector;
use tracing::debug;

use crate::config::BhepConfig;
use crate::distributions::LogNormal;
use crate::linalg::{self, Mahalanobis};
use crate::stats::CompensatedSum;
use crate::table::LabeledTable;

/// Outcome of [`LabeledTable::normality_test_bhep`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BhepResult {
    /// Upper-tail probability of `tnb` under the log-normal approximation.
    pub probability: f64,
    /// Test statistic.
    pub tnb: f64,
    /// `μ` of the approximating log-normal.
    pub lnmu: f64,
    /// `σ` of the approximating log-normal.
    pub lnvar: f64,
    /// Smoothing parameter `h` actually used.
    pub smoothing: f64,
}

impl LabeledTable {
    /// Runs the BHEP multivariate normality test over the rows.
    ///
    /// Returns `None` with fewer than two rows or no columns. A singular
    /// sample covariance does not fail the test: the statistic then takes
    /// the fixed value `4n`. When the null moments admit no log-normal
    /// (variance cancelling to zero at extreme smoothing), `probability`,
    /// `lnmu` and `lnvar` are NaN.
    ///
    /// # Examples
    /// ```
    /// use u_table::{BhepConfig, LabeledTable};
    /// let t = LabeledTable::from_rows(&[[0.1], [-0.7], [1.3], [0.4], [-1.1], [0.0]]).unwrap();
    /// let r = t.normality_test_bhep(BhepConfig::default()).unwrap();
    /// assert!((0.0..=1.0).contains(&r.probability));
    /// assert!(LabeledTable::new(1, 3).normality_test_bhep(BhepConfig::default()).is_none());
    /// ```
    pub fn normality_test_bhep(&self, config: BhepConfig) -> Option<BhepResult> {
        let (n, p) = self.shape();
        if n < 2 || p < 1 {
            return None;
        }
        let nf = n as f64;
        let pf = p as f64;
        let beta = match config.fixed_smoothing() {
            Some(h) => FRAC_1_SQRT_2 / h,
            None => {
                let e = 1.0 / (pf + 4.0);
                FRAC_1_SQRT_2 * ((1.0 + 2.0 * pf) / 4.0).powf(e) * nf.powf(e)
            }
        };
        let beta2 = beta * beta;
        let beta4 = beta2 * beta2;
        let beta8 = beta4 * beta4;
        let gamma = 1.0 + 2.0 * beta2;
        let delta = 1.0 + beta2 * (4.0 + 3.0 * beta2);
        let p2 = pf / 2.0;

        let tnb = match self.bhep_statistic(beta2) {
            Some(t) => t,
            None => {
                debug!(n, p, "singular covariance in BHEP test, statistic set to 4n");
                4.0 * nf
            }
        };

        let mu = 1.0
            - gamma.powf(-p2)
                * (1.0 + pf * beta2 / gamma + pf * (pf + 2.0) * beta4 / (2.0 * gamma * gamma));
        let var = 2.0 * (1.0 + 4.0 * beta2).powf(-p2)
            + 2.0
                * gamma.powf(-pf)
                * (1.0
                    + 2.0 * pf * beta4 / (gamma * gamma)
                    + 3.0 * pf * (pf + 2.0) * beta8 / (4.0 * gamma.powi(4)))
            - 4.0
                * delta.powf(-p2)
                * (1.0
                    + 3.0 * pf * beta4 / (2.0 * delta)
                    + pf * (pf + 2.0) * beta8 / (2.0 * delta * delta));

        let (probability, lnmu, lnvar) = lognormal_upper_tail(mu, var, tnb);
        Some(BhepResult {
            probability,
            tnb,
            lnmu,
            lnvar,
            smoothing: FRAC_1_SQRT_2 / beta,
        })
    }

    /// `None` when the sample covariance has no Cholesky factor.
    fn bhep_statistic(&self, beta2: f64) -> Option<f64> {
        let (n, p) = self.shape();
        let (centroid, cov) = linalg::covariance(self);
        let metric = Mahalanobis::new(&cov).ok()?;
        let whitened: Vec<DVector<f64>> = (0..n)
            .map(|i| metric.whiten(&DVector::from_row_slice(self.row(i))))
            .collect();
        let centre = metric.whiten(&centroid);

        let b1 = beta2 / 2.0;
        let b2 = b1 / (1.0 + beta2);
        let mut pairs = CompensatedSum::new();
        let mut singles = CompensatedSum::new();
        for j in 0..n {
            for k in 0..j {
                let d = (&whitened[j] - &whitened[k]).norm_squared();
                pairs.add(2.0 * (-b1 * d).exp());
            }
            pairs.add(1.0);
            singles.add((-b2 * (&whitened[j] - &centre).norm_squared()).exp());
        }

        let nf = n as f64;
        let p2 = p as f64 / 2.0;
        Some(
            pairs.value() / nf - 2.0 * (1.0 + beta2).powf(-p2) * singles.value()
                + nf * (1.0 + 2.0 * beta2).powf(-p2),
        )
    }
}

/// `(P(X > x), μ, σ)` for the log-normal with the given mean and variance,
/// all NaN when no such log-normal exists.
fn lognormal_upper_tail(mean: f64, variance: f64, x: f64) -> (f64, f64, f64) {
    match LogNormal::from_moments(mean, variance) {
        Ok(null) => (null.sf(x), null.mu(), null.sigma()),
        Err(err) => {
            debug!(mean, variance, %err, "BHEP null moments admit no log-normal");
            (f64::NAN, f64::NAN, f64::NAN)
        }
    }
}
