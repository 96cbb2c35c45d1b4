// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Ensemble configuration.
//!
//! This module defines the [`EnsembleConfig`] struct, which controls the number
//! of inference trials, the set of keypoint names excluded from aggregation,
//! and the cooperative pacing cadence of the trial loop.

use std::collections::HashSet;

use crate::error::{EnsembleError, Result};

/// Configuration for weighted multi-trial pose estimation.
///
/// This struct uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use pose_ensemble::{DISTAL_KEYPOINTS, EnsembleConfig};
///
/// let config = EnsembleConfig::new()
///     .with_trials(30)
///     .with_excluded(DISTAL_KEYPOINTS)
///     .with_yield_every(10);
/// ```
#[derive(Debug, Clone)]
pub struct EnsembleConfig {
    /// Number of repeated inference trials over the same decoded image.
    /// Must be at least 1.
    pub num_trials: usize,
    /// Keypoint names discarded entirely from aggregation and output.
    pub excluded: HashSet<String>,
    /// Invoke the pacing hook every this many trials. `0` disables pacing.
    pub yield_every: usize,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            num_trials: 50,
            excluded: HashSet::new(),
            yield_every: 10,
        }
    }
}

impl EnsembleConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of inference trials.
    ///
    /// # Arguments
    ///
    /// * `trials` - Trial count, at least 1.
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.num_trials = trials;
        self
    }

    /// Replace the excluded-keypoint set.
    ///
    /// # Arguments
    ///
    /// * `names` - Keypoint names to discard entirely from aggregation.
    #[must_use]
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add a single keypoint name to the excluded set.
    #[must_use]
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded.insert(name.into());
        self
    }

    /// Set the pacing cadence for the trial loop.
    ///
    /// The pacing hook is invoked on every trial index divisible by this
    /// value. Set to `0` to never invoke the hook.
    #[must_use]
    pub fn with_yield_every(mut self, every: usize) -> Self {
        self.yield_every = every;
        self
    }

    /// Check whether a keypoint name is excluded.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `num_trials` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.num_trials == 0 {
            return Err(EnsembleError::ConfigError(
                "num_trials must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
