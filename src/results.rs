// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Result types for weighted pose estimation output.

use std::collections::HashMap;
use std::fmt;

/// Timing information for an estimation run (in milliseconds).
#[derive(Debug, Clone, Default)]
pub struct Speed {
    /// Time spent reading and decoding the input image.
    pub decode: Option<f64>,
    /// Total time spent in the trial loop.
    pub trials: Option<f64>,
}

impl Speed {
    /// Create a new Speed instance with all timings.
    #[must_use]
    pub const fn new(decode: f64, trials: f64) -> Self {
        Self {
            decode: Some(decode),
            trials: Some(trials),
        }
    }

    /// Get total elapsed time in milliseconds.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.decode.unwrap_or(0.0) + self.trials.unwrap_or(0.0)
    }
}

/// One keypoint's confidence-weighted average position over all trials.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedKeypoint {
    /// Keypoint name.
    pub name: String,
    /// Confidence-weighted mean x coordinate in pixel space.
    pub x: f32,
    /// Confidence-weighted mean y coordinate in pixel space.
    pub y: f32,
    /// Accumulated confidence divided by the trial count.
    ///
    /// Dividing by the trial count rather than the detection count means
    /// keypoints that went undetected in some trials read as less reliable.
    pub score: f32,
}

impl fmt::Display for AggregatedKeypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} x: {:.1}, y: {:.1}, score: {:.3}",
            self.name, self.x, self.y, self.score
        )
    }
}

/// Values that can appear in a summary record.
#[derive(Debug, Clone)]
pub enum SummaryValue {
    /// String value.
    String(String),
    /// Float value.
    Float(f32),
}

/// Final output of a weighted multi-trial estimation run.
///
/// Holds one [`AggregatedKeypoint`] per keypoint name that was observed with
/// positive confidence in at least one trial, in first-observation order.
/// Excluded names and never-observed keypoints do not appear.
#[derive(Debug, Clone)]
pub struct PoseEstimate {
    /// Aggregated keypoints in first-observation order.
    pub keypoints: Vec<AggregatedKeypoint>,
    /// Number of trials the run was configured with.
    pub num_trials: usize,
    /// Run timing information.
    pub speed: Speed,
}

impl PoseEstimate {
    /// Create a new estimate.
    #[must_use]
    pub fn new(keypoints: Vec<AggregatedKeypoint>, num_trials: usize, speed: Speed) -> Self {
        Self {
            keypoints,
            num_trials,
            speed,
        }
    }

    /// Get the number of aggregated keypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    /// Check if no keypoint was ever observed with positive confidence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// Get an aggregated keypoint by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AggregatedKeypoint> {
        self.keypoints.iter().find(|kp| kp.name == name)
    }

    /// Generate the human-readable report, one line per keypoint.
    ///
    /// Each line reports the name padded to 16 columns, x and y to one decimal
    /// place, and the average score to three decimal places.
    #[must_use]
    pub fn verbose(&self) -> String {
        if self.is_empty() {
            return "(no keypoints)".to_string();
        }

        self.keypoints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Convert the estimate to a list of structured records.
    #[must_use]
    pub fn summary(&self) -> Vec<HashMap<String, SummaryValue>> {
        self.keypoints
            .iter()
            .map(|kp| {
                let mut entry = HashMap::new();
                entry.insert(
                    "name".to_string(),
                    SummaryValue::String(kp.name.clone()),
                );
                entry.insert("x".to_string(), SummaryValue::Float(kp.x));
                entry.insert("y".to_string(), SummaryValue::Float(kp.y));
                entry.insert("score".to_string(), SummaryValue::Float(kp.score));
                entry
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_estimate() -> PoseEstimate {
        PoseEstimate::new(
            vec![
                AggregatedKeypoint {
                    name: "nose".to_string(),
                    x: 11.285_714,
                    y: 21.285_714,
                    score: 0.466_666_65,
                },
                AggregatedKeypoint {
                    name: "left_eye".to_string(),
                    x: 8.0,
                    y: 18.0,
                    score: 0.9,
                },
            ],
            3,
            Speed::default(),
        )
    }

    #[test]
    fn test_display_format() {
        let estimate = sample_estimate();
        let line = estimate.keypoints[0].to_string();
        assert_eq!(line, "nose             x: 11.3, y: 21.3, score: 0.467");
    }

    #[test]
    fn test_verbose_lines() {
        let estimate = sample_estimate();
        let report = estimate.verbose();
        assert_eq!(report.lines().count(), 2);
        assert!(report.lines().all(|l| l.contains("score:")));
    }

    #[test]
    fn test_verbose_empty() {
        let estimate = PoseEstimate::new(vec![], 5, Speed::default());
        assert!(estimate.is_empty());
        assert_eq!(estimate.verbose(), "(no keypoints)");
    }

    #[test]
    fn test_get_by_name() {
        let estimate = sample_estimate();
        assert!(estimate.get("left_eye").is_some());
        assert!(estimate.get("left_ankle").is_none());
    }

    #[test]
    fn test_summary_records() {
        let estimate = sample_estimate();
        let records = estimate.summary();
        assert_eq!(records.len(), 2);
        match records[0].get("name") {
            Some(SummaryValue::String(name)) => assert_eq!(name, "nose"),
            other => panic!("unexpected name entry: {other:?}"),
        }
        assert!(matches!(
            records[0].get("score"),
            Some(SummaryValue::Float(_))
        ));
    }

    #[test]
    fn test_speed_total() {
        let speed = Speed::new(12.0, 480.0);
        assert!((speed.total() - 492.0).abs() < 1e-9);
    }
}
