// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Confidence-weighted multi-trial aggregation.
//!
//! Repeated inference on the same decoded image is noisy: a keypoint detector
//! returns slightly different coordinates and scores on every call. The
//! aggregator runs N trials and folds every observation of a keypoint name
//! into a single running sum weighted by its confidence score, so
//! low-confidence detections pull the final position less than high-confidence
//! ones. The result is a confidence-weighted mean estimator per keypoint.

use std::collections::HashMap;
use std::time::Instant;

use crate::config::EnsembleConfig;
use crate::error::Result;
use crate::keypoint::Pose;
use crate::results::{AggregatedKeypoint, PoseEstimate, Speed};
use crate::source::PoseSource;

/// Running weighted sums for one keypoint name.
#[derive(Debug, Clone, Copy, Default)]
struct WeightedSum {
    sum_x: f32,
    sum_y: f32,
    sum_score: f32,
}

/// Accumulator of confidence-weighted keypoint sums across trials.
///
/// Keyed by keypoint name only — all trials contribute to the same running
/// sum. Entries are kept in first-observation order, which is the order they
/// appear in the finalized output.
#[derive(Debug, Clone, Default)]
pub struct KeypointAccumulator {
    entries: Vec<(String, WeightedSum)>,
    index: HashMap<String, usize>,
}

impl KeypointAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one pose's keypoints into the running sums.
    ///
    /// Keypoints whose name is excluded by `config` are skipped entirely; they
    /// never create an entry regardless of their score.
    pub fn observe(&mut self, pose: &Pose, config: &EnsembleConfig) {
        for kp in &pose.keypoints {
            if config.is_excluded(&kp.name) {
                continue;
            }

            let idx = match self.index.get(&kp.name) {
                Some(&idx) => idx,
                None => {
                    let idx = self.entries.len();
                    self.entries.push((kp.name.clone(), WeightedSum::default()));
                    self.index.insert(kp.name.clone(), idx);
                    idx
                }
            };

            let entry = &mut self.entries[idx].1;
            entry.sum_x += kp.x * kp.score;
            entry.sum_y += kp.y * kp.score;
            entry.sum_score += kp.score;
        }
    }

    /// Number of distinct keypoint names observed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compute the weighted averages.
    ///
    /// Entries with zero accumulated confidence are omitted rather than
    /// reported as zero, so no division by zero can occur.
    #[must_use]
    pub fn finalize(&self, num_trials: usize) -> Vec<AggregatedKeypoint> {
        #[allow(clippy::cast_precision_loss)]
        let trials = num_trials as f32;

        self.entries
            .iter()
            .filter(|(_, sums)| sums.sum_score > 0.0)
            .map(|(name, sums)| AggregatedKeypoint {
                name: name.clone(),
                x: sums.sum_x / sums.sum_score,
                y: sums.sum_y / sums.sum_score,
                score: sums.sum_score / trials,
            })
            .collect()
    }
}

/// Run `config.num_trials` inference trials and aggregate the keypoints.
///
/// Per trial: invoke `source`; skip the trial if it reports zero detections;
/// otherwise take only the first pose and fold its non-excluded keypoints into
/// the accumulator. Additional detections beyond the first are ignored by
/// design — the estimator assumes a single-subject image, and behavior on
/// multi-person input is deliberately out of scope.
///
/// Source failures propagate immediately; there is no retry and no partial
/// result.
///
/// # Errors
///
/// Returns `ConfigError` if the configuration is invalid, or any error raised
/// by the source.
pub fn weighted_pose_estimate<S: PoseSource>(
    source: &mut S,
    config: &EnsembleConfig,
) -> Result<PoseEstimate> {
    weighted_pose_estimate_with_pacing(source, config, |_| {})
}

/// [`weighted_pose_estimate`] with a cooperative pacing hook.
///
/// The hook receives the trial index and is invoked on every index divisible
/// by `config.yield_every`, letting a host runtime reclaim the thread between
/// bursts of native compute. Supply a no-op on platforms without a cooperative
/// scheduler; pacing is advisory, not a correctness requirement.
///
/// # Errors
///
/// Same as [`weighted_pose_estimate`].
pub fn weighted_pose_estimate_with_pacing<S, F>(
    source: &mut S,
    config: &EnsembleConfig,
    mut pause: F,
) -> Result<PoseEstimate>
where
    S: PoseSource,
    F: FnMut(usize),
{
    config.validate()?;

    let start = Instant::now();
    let mut accumulator = KeypointAccumulator::new();

    for trial in 0..config.num_trials {
        let poses = source.estimate()?;

        if let Some(first) = poses.first() {
            accumulator.observe(first, config);
        }

        if config.yield_every > 0 && trial % config.yield_every == 0 {
            pause(trial);
        }
    }

    let trials_ms = start.elapsed().as_secs_f64() * 1000.0;
    let keypoints = accumulator.finalize(config.num_trials);

    Ok(PoseEstimate::new(
        keypoints,
        config.num_trials,
        Speed {
            decode: None,
            trials: Some(trials_ms),
        },
    ))
}
