//! Pure statistics over already-fetched sample values
//!
//! Everything here is population statistics (divisor N, not N-1).

use statrs::distribution::{ContinuousCDF, Normal};

use crate::types::{GlobalStats, UserStats};

/// Percentile returned when the global distribution has no spread
pub const DEGENERATE_PERCENTILE: f64 = 50.0;

/// Streaming population mean and standard deviation (Welford).
///
/// The squared-deviation sum is kept relative to the largest magnitude seen
/// so far, and the mean is updated as `x/n - mean/n`. Neither intermediate can
/// leave the finite range, so any finite input yields finite statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Welford {
    count: u64,
    mean: f64,
    /// Largest `|x|` seen; unit of `m2`
    scale: f64,
    /// Sum of squared deviations divided by `scale^2`
    m2: f64,
}

impl Welford {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let n = self.count as f64;

        let magnitude = x.abs();
        if magnitude > self.scale {
            if self.scale > 0.0 {
                self.m2 *= (self.scale / magnitude).powi(2);
            }
            self.scale = magnitude;
        }

        // |mean| never exceeds the previous scale
        let delta = if self.scale > 0.0 {
            x / self.scale - self.mean / self.scale
        } else {
            0.0
        };
        self.mean += x / n - self.mean / n;
        let delta2 = if self.scale > 0.0 {
            x / self.scale - self.mean / self.scale
        } else {
            0.0
        };
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation, 0 below two samples
    pub fn stdev(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let scaled_variance = (self.m2 / self.count as f64).max(0.0);
        self.scale * scaled_variance.sqrt()
    }
}

impl FromIterator<f64> for Welford {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Welford::new();
        for x in iter {
            acc.update(x);
        }
        acc
    }
}

/// Population mean and standard deviation. Empty input yields `(0, 0)`,
/// a single value yields `(value, 0)`.
pub fn mean_stdev(values: &[f64]) -> (f64, f64) {
    let acc: Welford = values.iter().copied().collect();
    (acc.mean(), acc.stdev())
}

impl UserStats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let (mean, stdev) = mean_stdev(samples);
        Self {
            mean,
            count: samples.len() as u64,
            stdev,
        }
    }
}

impl GlobalStats {
    /// Build from one mean per contributing user
    pub fn from_user_means(means: &[f64]) -> Self {
        let (mean, stdev) = mean_stdev(means);
        let users = means.len() as u64;
        Self {
            mean,
            stdev,
            count: users,
            total_users: users,
        }
    }
}

/// Rank `user_mean` within a normal distribution with the given parameters,
/// as a percentage in `[0, 100]`.
///
/// Assumes per-user means are roughly normal across the population. With no
/// spread there is nothing to rank against and the result is 50.
pub fn percentile(user_mean: f64, global_mean: f64, global_stdev: f64) -> f64 {
    if !global_stdev.is_finite() || global_stdev <= 0.0 {
        return DEGENERATE_PERCENTILE;
    }

    // Halved operands keep the difference finite for any finite inputs
    let z = (user_mean / 2.0 - global_mean / 2.0) / (global_stdev / 2.0);
    if z.is_nan() {
        return DEGENERATE_PERCENTILE;
    }

    match Normal::new(0.0, 1.0) {
        Ok(standard) => (standard.cdf(z) * 100.0).clamp(0.0, 100.0),
        Err(_) => DEGENERATE_PERCENTILE,
    }
}
