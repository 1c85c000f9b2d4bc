//! Two-pole resonator filter family.
//!
//! All variants share one second-order recursion and differ in how the
//! coefficients are derived from a centre frequency and bandwidth, and in
//! which past samples feed the output:
//!
//! | kind | output |
//! |---|---|
//! | [`FilterKind::Resonator`] | `a·x[n] + b·y[n−1] + c·y[n−2]` |
//! | [`FilterKind::AntiResonator`] | `a·(x[n] − b·x[n−1] − c·x[n−2])` |
//! | [`FilterKind::ConstantGainResonator`] | `a·(x[n] + d·x[n−2]) + b·y[n−1] + c·y[n−2]` |
//!
//! Reference: Klatt (1980), "Software for a cascade/parallel formant
//! synthesizer", *JASA* 67(3).

use std::f64::consts::PI;

/// Filter variant, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// All-pole resonator. With `normalise_at_dc` the gain at 0 Hz is one,
    /// otherwise the gain at the centre frequency is one.
    Resonator { normalise_at_dc: bool },
    /// All-zero inverse of the resonator, unit gain at 0 Hz.
    AntiResonator,
    /// Resonator with an extra zero pair so the peak gain barely depends
    /// on the centre frequency.
    ConstantGainResonator,
}

/// Second-order filter with its coefficients and sample memory.
///
/// # Examples
/// ```
/// use u_table::filter::Filter;
/// let mut f = Filter::resonator(1.0 / 8000.0, true);
/// f.set_coefficients(500.0, 100.0);
/// let mut y = 0.0;
/// for _ in 0..20_000 {
///     y = f.process_sample(1.0);
/// }
/// assert!((y - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    kind: FilterKind,
    dt: f64,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    p1: f64,
    p2: f64,
    p3: f64,
    p4: f64,
}

impl Filter {
    /// An all-pass filter of `kind` for sampling period `dt` seconds.
    pub fn new(kind: FilterKind, dt: f64) -> Self {
        Self {
            kind,
            dt,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            p1: 0.0,
            p2: 0.0,
            p3: 0.0,
            p4: 0.0,
        }
    }

    pub fn resonator(dt: f64, normalise_at_dc: bool) -> Self {
        Self::new(FilterKind::Resonator { normalise_at_dc }, dt)
    }

    pub fn anti_resonator(dt: f64) -> Self {
        Self::new(FilterKind::AntiResonator, dt)
    }

    pub fn constant_gain_resonator(dt: f64) -> Self {
        Self::new(FilterKind::ConstantGainResonator, dt)
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn sampling_period(&self) -> f64 {
        self.dt
    }

    /// `(a, b, c, d)`.
    pub fn coefficients(&self) -> (f64, f64, f64, f64) {
        (self.a, self.b, self.c, self.d)
    }

    /// Forgets past inputs and outputs.
    pub fn reset_memory(&mut self) {
        self.p1 = 0.0;
        self.p2 = 0.0;
        self.p3 = 0.0;
        self.p4 = 0.0;
    }

    /// Derives the coefficients from a centre `frequency` and `bandwidth`
    /// in Hz. Sample memory is kept.
    pub fn set_coefficients(&mut self, frequency: f64, bandwidth: f64) {
        match self.kind {
            FilterKind::Resonator { normalise_at_dc } => {
                let r = self.set_two_pole(frequency, bandwidth);
                if !normalise_at_dc {
                    self.a = (1.0 - r * r) * (2.0 * PI * frequency * self.dt).sin();
                }
            }
            FilterKind::AntiResonator => {
                if frequency <= 0.0 && bandwidth <= 0.0 {
                    self.a = 1.0;
                    self.b = -2.0;
                    self.c = 1.0;
                } else {
                    self.set_two_pole(frequency, bandwidth);
                    self.a = 1.0 / (1.0 - self.b - self.c);
                }
            }
            FilterKind::ConstantGainResonator => {
                let r = self.set_two_pole(frequency, bandwidth);
                self.a = 1.0 - r;
                self.d = -r;
            }
        }
    }

    /// Pole radius `r`, `b = 2r·cos(2πf·dt)`, `c = −r²` and DC-normalized
    /// `a`. Returns `r`.
    fn set_two_pole(&mut self, frequency: f64, bandwidth: f64) -> f64 {
        let r = (-PI * self.dt * bandwidth).exp();
        self.c = -(r * r);
        self.b = 2.0 * r * (2.0 * PI * frequency * self.dt).cos();
        self.a = 1.0 - self.b - self.c;
        r
    }

    /// Filters one sample.
    pub fn process_sample(&mut self, x: f64) -> f64 {
        match self.kind {
            FilterKind::Resonator { .. } => {
                let y = self.a * x + self.b * self.p1 + self.c * self.p2;
                self.p2 = self.p1;
                self.p1 = y;
                y
            }
            FilterKind::AntiResonator => {
                let y = self.a * (x - self.b * self.p1 - self.c * self.p2);
                self.p2 = self.p1;
                self.p1 = x;
                y
            }
            FilterKind::ConstantGainResonator => {
                let y = self.a * (x + self.d * self.p4) + self.b * self.p1 + self.c * self.p2;
                self.p2 = self.p1;
                self.p1 = y;
                self.p4 = self.p3;
                self.p3 = x;
                y
            }
        }
    }

    /// Filters `samples` in place, continuing from the current memory.
    pub fn process(&mut self, samples: &mut [f64]) {
        for s in samples.iter_mut() {
            *s = self.process_sample(*s);
        }
    }
}
