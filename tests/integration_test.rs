// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the pose-ensemble library

use pose_ensemble::{
    DISTAL_KEYPOINTS, EnsembleConfig, EnsembleError, Keypoint, Pose, ReplaySource, from_fn,
    weighted_pose_estimate, weighted_pose_estimate_with_pacing,
};

fn full_pose(score: f32) -> Pose {
    let keypoints = pose_ensemble::COCO_KEYPOINT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Keypoint::new(*name, i as f32 * 10.0, i as f32 * 5.0, score))
        .collect();
    Pose::new(keypoints)
}

#[test]
fn test_distal_exclusion_end_to_end() {
    let mut source = ReplaySource::new(vec![vec![full_pose(0.8)]; 10]);
    let config = EnsembleConfig::new()
        .with_trials(10)
        .with_excluded(DISTAL_KEYPOINTS);

    let estimate = weighted_pose_estimate(&mut source, &config).unwrap();

    // 17 COCO keypoints minus 10 distal ones
    assert_eq!(estimate.len(), 7);
    for name in DISTAL_KEYPOINTS {
        assert!(estimate.get(name).is_none(), "{name} leaked into output");
    }
    for kp in &estimate.keypoints {
        assert!((kp.score - 0.8).abs() < 1e-4);
    }
}

#[test]
fn test_intermittent_detection_weighting() {
    // Detection present in 2 of 5 trials with differing confidence: the final
    // position leans toward the higher-confidence observation.
    let mut source = ReplaySource::new(vec![
        vec![],
        vec![Pose::new(vec![Keypoint::new("nose", 100.0, 200.0, 0.2)])],
        vec![],
        vec![Pose::new(vec![Keypoint::new("nose", 110.0, 210.0, 0.8)])],
        vec![],
    ]);
    let config = EnsembleConfig::new().with_trials(5);

    let estimate = weighted_pose_estimate(&mut source, &config).unwrap();
    let nose = estimate.get("nose").unwrap();

    assert!((nose.x - 108.0).abs() < 1e-3); // (100*0.2 + 110*0.8) / 1.0
    assert!((nose.y - 208.0).abs() < 1e-3);
    assert!((nose.score - 0.2).abs() < 1e-4); // 1.0 / 5 trials
    assert!(nose.x > 105.0, "estimate should lean toward the 0.8 trial");
}

#[test]
fn test_report_formatting() {
    let mut source = ReplaySource::new(vec![
        vec![],
        vec![Pose::new(vec![Keypoint::new("nose", 10.0, 20.0, 0.5)])],
        vec![Pose::new(vec![Keypoint::new("nose", 12.0, 22.0, 0.9)])],
    ]);
    let config = EnsembleConfig::new().with_trials(3);

    let estimate = weighted_pose_estimate(&mut source, &config).unwrap();
    assert_eq!(
        estimate.verbose(),
        "nose             x: 11.3, y: 21.3, score: 0.467"
    );

    let records = estimate.summary();
    assert_eq!(records.len(), 1);
    assert!(records[0].contains_key("name"));
    assert!(records[0].contains_key("score"));
}

#[test]
fn test_failure_propagates_without_partial_result() {
    let mut calls = 0;
    {
        let mut source = from_fn(|| {
            calls += 1;
            if calls > 3 {
                Err(EnsembleError::InferenceError("backend gone".to_string()))
            } else {
                Ok(vec![full_pose(0.9)])
            }
        });
        let config = EnsembleConfig::new().with_trials(10);

        let result = weighted_pose_estimate(&mut source, &config);
        assert!(result.is_err());
    }
    assert_eq!(calls, 4);
}

#[test]
fn test_pacing_hook_sees_trial_indices() {
    let mut source = ReplaySource::new(vec![vec![full_pose(0.5)]; 30]);
    let config = EnsembleConfig::new().with_trials(30).with_yield_every(10);
    let mut seen = Vec::new();

    let estimate =
        weighted_pose_estimate_with_pacing(&mut source, &config, |trial| seen.push(trial)).unwrap();

    assert_eq!(seen, vec![0, 10, 20]);
    assert_eq!(estimate.num_trials, 30);
}

#[test]
fn test_exhausted_source_counts_as_no_detection() {
    // Script covers only 2 of 6 trials; the remaining trials detect nothing
    // and must not disturb the accumulated averages.
    let mut source = ReplaySource::new(vec![
        vec![Pose::new(vec![Keypoint::new("nose", 50.0, 60.0, 1.0)])],
        vec![Pose::new(vec![Keypoint::new("nose", 50.0, 60.0, 1.0)])],
    ]);
    let config = EnsembleConfig::new().with_trials(6);

    let estimate = weighted_pose_estimate(&mut source, &config).unwrap();
    let nose = estimate.get("nose").unwrap();

    assert!((nose.x - 50.0).abs() < 1e-4);
    assert!((nose.y - 60.0).abs() < 1e-4);
    assert!((nose.score - 2.0 / 6.0).abs() < 1e-4);
}
