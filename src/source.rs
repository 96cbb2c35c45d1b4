// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose-estimation capability seam.
//!
//! The aggregator never talks to a model directly; it is handed a
//! [`PoseSource`], a capability that is invoked once per trial and returns the
//! poses detected on the fixed input. `MoveNetModel::bind` produces one backed
//! by a real ONNX session; [`ReplaySource`] and [`from_fn`] provide doubles
//! for tests and custom backends.

use crate::error::Result;
use crate::keypoint::Pose;

/// A pose-estimation capability invoked once per trial.
///
/// Implementations hold whatever fixed input they need (a decoded image, a
/// loaded model session); the aggregator calls [`estimate`](Self::estimate)
/// with no arguments. Errors propagate uncaught to the caller — the aggregator
/// performs no retry or fallback.
pub trait PoseSource {
    /// Run one inference trial.
    ///
    /// # Returns
    ///
    /// The list of detected poses, possibly empty.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    fn estimate(&mut self) -> Result<Vec<Pose>>;
}

impl<S: PoseSource + ?Sized> PoseSource for &mut S {
    fn estimate(&mut self) -> Result<Vec<Pose>> {
        (**self).estimate()
    }
}

/// Adapter turning a closure into a [`PoseSource`].
///
/// See [`from_fn`].
pub struct FnSource<F>(F);

/// Build a [`PoseSource`] from a closure.
///
/// # Example
///
/// ```rust
/// use pose_ensemble::source::from_fn;
/// use pose_ensemble::{Keypoint, Pose};
///
/// let mut source = from_fn(|| {
///     Ok(vec![Pose::new(vec![Keypoint::new("nose", 10.0, 20.0, 0.9)])])
/// });
/// ```
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: FnMut() -> Result<Vec<Pose>>,
{
    FnSource(f)
}

impl<F> PoseSource for FnSource<F>
where
    F: FnMut() -> Result<Vec<Pose>>,
{
    fn estimate(&mut self) -> Result<Vec<Pose>> {
        (self.0)()
    }
}

/// A scripted pose source replaying a fixed sequence of trial outputs.
///
/// Each call to `estimate` returns the next scripted trial; once the script is
/// exhausted, further trials report zero detections.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    trials: Vec<Vec<Pose>>,
    cursor: usize,
}

impl ReplaySource {
    /// Create a replay source from a sequence of per-trial detections.
    #[must_use]
    pub fn new(trials: Vec<Vec<Pose>>) -> Self {
        Self { trials, cursor: 0 }
    }

    /// Number of trials consumed so far.
    #[must_use]
    pub const fn trials_served(&self) -> usize {
        self.cursor
    }
}

impl PoseSource for ReplaySource {
    fn estimate(&mut self) -> Result<Vec<Pose>> {
        let poses = self.trials.get(self.cursor).cloned().unwrap_or_default();
        self.cursor += 1;
        Ok(poses)
    }
}
