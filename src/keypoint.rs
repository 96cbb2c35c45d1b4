// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Keypoint and pose data model.
//!
//! A [`Keypoint`] is one named anatomical landmark with estimated 2D pixel
//! coordinates and a confidence score. A [`Pose`] is the list of keypoints
//! reported for a single detected subject in a single trial.

/// COCO-Pose keypoint names, indexed by model output position.
pub const COCO_KEYPOINT_NAMES: [&str; 17] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

/// Distal limb keypoints (ankles, knees, hips, wrists, elbows).
///
/// These are the joints most affected by per-inference jitter on single-frame
/// input. Pass this slice to `EnsembleConfig::with_excluded` to restrict
/// aggregation to the torso and head.
pub const DISTAL_KEYPOINTS: [&str; 10] = [
    "right_ankle",
    "left_ankle",
    "right_knee",
    "left_knee",
    "right_hip",
    "left_hip",
    "right_wrist",
    "left_wrist",
    "right_elbow",
    "left_elbow",
];

/// One keypoint observation from a single inference trial.
#[derive(Debug, Clone, PartialEq)]
pub struct Keypoint {
    /// Stable keypoint name (e.g., "nose", "left_shoulder").
    pub name: String,
    /// X coordinate in original image pixel space.
    pub x: f32,
    /// Y coordinate in original image pixel space.
    pub y: f32,
    /// Confidence score, treated as a non-negative weight (nominally 0.0 to 1.0).
    pub score: f32,
}

impl Keypoint {
    /// Create a new keypoint observation.
    #[must_use]
    pub fn new(name: impl Into<String>, x: f32, y: f32, score: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            score,
        }
    }
}

/// All keypoints reported for one detected subject in one trial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    /// Keypoint observations in model output order.
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    /// Create a pose from a list of keypoint observations.
    #[must_use]
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Get a keypoint by name.
    ///
    /// # Returns
    ///
    /// * `Some` reference to the first keypoint with this name, otherwise `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.name == name)
    }

    /// Get the number of keypoints in this pose.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    /// Check if the pose has no keypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coco_table() {
        assert_eq!(COCO_KEYPOINT_NAMES.len(), 17);
        assert_eq!(COCO_KEYPOINT_NAMES[0], "nose");
        assert_eq!(COCO_KEYPOINT_NAMES[16], "right_ankle");
    }

    #[test]
    fn test_distal_subset_of_coco() {
        for name in DISTAL_KEYPOINTS {
            assert!(COCO_KEYPOINT_NAMES.contains(&name), "{name} not a COCO keypoint");
        }
    }

    #[test]
    fn test_pose_get() {
        let pose = Pose::new(vec![
            Keypoint::new("nose", 10.0, 20.0, 0.9),
            Keypoint::new("left_eye", 8.0, 18.0, 0.8),
        ]);

        assert_eq!(pose.len(), 2);
        assert!(!pose.is_empty());
        assert!((pose.get("nose").unwrap().x - 10.0).abs() < f32::EPSILON);
        assert!(pose.get("left_ankle").is_none());
    }
}
