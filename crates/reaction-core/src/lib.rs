//! Reaction-time statistics core
//!
//! Stores per-user reaction-time samples and derives:
//! - per-user mean, standard deviation and count
//! - global statistics over the distribution of per-user means
//! - a percentile rank for a user within that distribution

pub mod engine;
pub mod error;
pub mod stats;
pub mod store;
pub mod types;

pub use engine::Engine;
pub use error::{Error, Result};
pub use stats::percentile;
pub use store::{SampleStore, StoreConfig};
pub use types::{GlobalStats, SubmissionResult, UserStats, ValueBounds};
