//! Result types returned to callers, plus the submission value policy

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Descriptive statistics over one user's samples
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub mean: f64,
    pub count: u64,
    pub stdev: f64,
}

/// Statistics over the distribution of per-user means.
///
/// Every user with at least one sample contributes exactly one data point,
/// so `count` and `total_users` are always equal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalStats {
    pub mean: f64,
    pub stdev: f64,
    pub count: u64,
    pub total_users: u64,
}

/// Everything a caller needs to render after a successful submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub mean: f64,
    pub stdev: f64,
    pub count: u64,
    pub global_mean: f64,
    pub global_stdev: f64,
    pub total_users: u64,
    pub percentile: f64,
}

impl SubmissionResult {
    pub fn new(user: UserStats, global: GlobalStats, percentile: f64) -> Self {
        Self {
            mean: user.mean,
            stdev: user.stdev,
            count: user.count,
            global_mean: global.mean,
            global_stdev: global.stdev,
            total_users: global.total_users,
            percentile,
        }
    }
}

/// Inclusive range of accepted sample values, in milliseconds.
/// Values outside it are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ValueBounds {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 60_000.0,
        }
    }
}

impl ValueBounds {
    /// Accept any finite value
    pub fn unbounded() -> Self {
        Self {
            min: f64::MIN,
            max: f64::MAX,
        }
    }

    /// Check a submitted value against the policy, returning it when accepted
    pub fn validate(&self, value: Option<f64>) -> Result<f64> {
        let value = value.ok_or_else(|| Error::InvalidInput("missing value".into()))?;
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "value must be a finite number, got {}",
                value
            )));
        }
        if value < self.min || value > self.max {
            return Err(Error::InvalidInput(format!(
                "value {} outside accepted range [{}, {}]",
                value, self.min, self.max
            )));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bounds_accept_in_range() {
        let bounds = ValueBounds::default();
        assert_eq!(bounds.validate(Some(0.0)).unwrap(), 0.0);
        assert_eq!(bounds.validate(Some(250.5)).unwrap(), 250.5);
        assert_eq!(bounds.validate(Some(60_000.0)).unwrap(), 60_000.0);
    }

    #[test]
    fn test_bounds_reject_missing_and_non_finite() {
        let bounds = ValueBounds::unbounded();
        assert!(matches!(bounds.validate(None), Err(Error::InvalidInput(_))));
        assert!(matches!(
            bounds.validate(Some(f64::NAN)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            bounds.validate(Some(f64::INFINITY)),
            Err(Error::InvalidInput(_))
        ));
        assert!(bounds.validate(Some(-5.0)).is_ok());
    }

    #[test]
    fn test_bounds_reject_out_of_range() {
        let bounds = ValueBounds::default();
        assert!(matches!(
            bounds.validate(Some(-1.0)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            bounds.validate(Some(60_000.1)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_submission_result_serializes_flat() {
        let result = SubmissionResult::new(
            UserStats {
                mean: 20.0,
                count: 3,
                stdev: 8.0,
            },
            GlobalStats {
                mean: 15.0,
                stdev: 5.0,
                count: 2,
                total_users: 2,
            },
            84.1,
        );
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["mean"], 20.0);
        assert_eq!(json["count"], 3);
        assert_eq!(json["global_mean"], 15.0);
        assert_eq!(json["global_stdev"], 5.0);
        assert_eq!(json["total_users"], 2);
        assert_eq!(json["percentile"], 84.1);
    }
}
