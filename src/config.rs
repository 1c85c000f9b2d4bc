//! Option structs for the table engines.

/// Preprocessing applied to each table before correlating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationOptions {
    /// Subtract the mean of each correlated vector first (default: true).
    pub centre: bool,

    /// Scale each correlated vector to unit L2 norm (default: true).
    ///
    /// With both flags set the result holds Pearson correlations.
    pub normalize: bool,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            centre: true,
            normalize: true,
        }
    }
}

impl CorrelationOptions {
    /// Raw dot products: no centring, no normalization.
    pub fn raw() -> Self {
        Self {
            centre: false,
            normalize: false,
        }
    }

    pub fn centre(mut self, centre: bool) -> Self {
        self.centre = centre;
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

/// Settings for the BHEP multivariate normality test.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BhepConfig {
    /// Kernel smoothing parameter `h`.
    ///
    /// `None`, zero or negative selects the data-driven default
    /// `β = ((1 + 2p)/4)^(1/(p+4)) · n^(1/(p+4)) / √2`.
    pub smoothing: Option<f64>,
}

impl BhepConfig {
    /// Fixed smoothing parameter `h`.
    pub fn with_smoothing(h: f64) -> Self {
        Self { smoothing: Some(h) }
    }

    /// The user-supplied `h` when it is usable.
    pub(crate) fn fixed_smoothing(&self) -> Option<f64> {
        self.smoothing.filter(|&h| h > 0.0)
    }
}

/// Aggregation applied to each label group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregate {
    /// Arithmetic mean of the group's rows.
    #[default]
    Mean,
    /// Median of the group's rows.
    Median,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_defaults() {
        let o = CorrelationOptions::default();
        assert!(o.centre && o.normalize);
        let raw = CorrelationOptions::raw();
        assert!(!raw.centre && !raw.normalize);
        assert_eq!(CorrelationOptions::raw().normalize(true).centre(true), o);
    }

    #[test]
    fn test_bhep_smoothing_filter() {
        assert_eq!(BhepConfig::default().fixed_smoothing(), None);
        assert_eq!(BhepConfig::with_smoothing(-1.0).fixed_smoothing(), None);
        assert_eq!(BhepConfig::with_smoothing(0.0).fixed_smoothing(), None);
        assert_eq!(BhepConfig::with_smoothing(0.5).fixed_smoothing(), Some(0.5));
    }

    #[test]
    fn test_aggregate_default_is_mean() {
        assert_eq!(Aggregate::default(), Aggregate::Mean);
    }
}
