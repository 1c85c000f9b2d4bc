//! Probability distributions.
//!
//! Only the log-normal law is needed here: the BHEP statistic is referred
//! to a moment-matched log-normal to obtain its p-value.

use thiserror::Error;

use crate::special;

/// Error type for invalid distribution parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),
}

/// Log-normal distribution: if X ~ LogNormal(μ, σ), then ln(X) ~ N(μ, σ²).
///
/// # Mathematical Definition
/// - CDF: Φ((ln(x)−μ)/σ)
/// - Upper tail: Q((ln(x)−μ)/σ) = ½·erfc((ln(x)−μ)/(σ√2))
/// - Mean: exp(μ + σ²/2)
/// - Variance: (exp(σ²) − 1) · exp(2μ + σ²)
///
/// Reference: Johnson, Kotz & Balakrishnan (1994), *Continuous Univariate
/// Distributions*, Vol. 1, Chapter 14.
#[derive(Debug, Clone, PartialEq)]
pub struct LogNormal {
    mu: f64,
    sigma: f64,
}

impl LogNormal {
    /// Creates a new log-normal distribution.
    ///
    /// Parameters `mu` and `sigma` are the mean and std dev of ln(X).
    ///
    /// # Errors
    /// Returns `Err` if `sigma ≤ 0` or parameters are not finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self, DistributionError> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "LogNormal requires finite μ and σ > 0, got μ={mu}, σ={sigma}"
            )));
        }
        Ok(Self { mu, sigma })
    }

    /// Moment-matched log-normal with the given mean and variance of X.
    ///
    /// `σ² = ln(1 + var/mean²)`, `μ = ln(mean) − σ²/2`.
    ///
    /// # Examples
    /// ```
    /// use u_table::distributions::LogNormal;
    /// let d = LogNormal::from_moments(2.0, 0.5).unwrap();
    /// assert!((d.mean() - 2.0).abs() < 1e-12);
    /// assert!((d.variance() - 0.5).abs() < 1e-12);
    /// ```
    pub fn from_moments(mean: f64, variance: f64) -> Result<Self, DistributionError> {
        if !(mean > 0.0) || !(variance > 0.0) {
            return Err(DistributionError::InvalidParameters(format!(
                "moment matching requires mean > 0 and variance > 0, got mean={mean}, variance={variance}"
            )));
        }
        let m2 = mean * mean;
        let s2 = ((m2 + variance) / m2).ln();
        Self::new(0.5 * (m2 * m2 / (m2 + variance)).ln(), s2.sqrt())
    }

    /// Location parameter μ (mean of ln X).
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Scale parameter σ (std dev of ln X).
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Mean = exp(μ + σ²/2).
    pub fn mean(&self) -> f64 {
        (self.mu + self.sigma * self.sigma / 2.0).exp()
    }

    /// Variance = (exp(σ²) − 1) · exp(2μ + σ²).
    pub fn variance(&self) -> f64 {
        let s2 = self.sigma * self.sigma;
        (s2.exp() - 1.0) * (2.0 * self.mu + s2).exp()
    }

    /// PDF for x > 0.
    pub fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let z = (x.ln() - self.mu) / self.sigma;
        special::standard_normal_pdf(z) / (x * self.sigma)
    }

    /// CDF: Φ((ln(x)−μ)/σ) for x > 0.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        special::standard_normal_cdf((x.ln() - self.mu) / self.sigma)
    }

    /// Upper tail P(X > x), accurate far into the tail.
    pub fn sf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 1.0;
        }
        special::standard_normal_q((x.ln() - self.mu) / self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lognormal_rejects_bad_sigma() {
        assert!(LogNormal::new(0.0, 0.0).is_err());
        assert!(LogNormal::new(0.0, -1.0).is_err());
        assert!(LogNormal::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_lognormal_median_is_exp_mu() {
        let d = LogNormal::new(1.0, 0.5).unwrap();
        assert!((d.cdf(1.0_f64.exp()) - 0.5).abs() < 1e-7);
        assert!((d.sf(1.0_f64.exp()) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_lognormal_sf_nonpositive() {
        let d = LogNormal::new(0.0, 1.0).unwrap();
        assert_eq!(d.sf(0.0), 1.0);
        assert_eq!(d.sf(-3.0), 1.0);
        assert_eq!(d.cdf(-3.0), 0.0);
        assert_eq!(d.pdf(0.0), 0.0);
    }

    #[test]
    fn test_from_moments_roundtrip() {
        let d = LogNormal::from_moments(0.3, 0.02).unwrap();
        assert!((d.mean() - 0.3).abs() < 1e-12);
        assert!((d.variance() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_from_moments_invalid() {
        assert!(LogNormal::from_moments(0.0, 1.0).is_err());
        assert!(LogNormal::from_moments(1.0, 0.0).is_err());
        assert!(LogNormal::from_moments(f64::NAN, 1.0).is_err());
    }
}
