// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # Pose Ensemble
//!
//! Stabilized single-image human-pose keypoint estimation, written in Rust.
//!
//! A keypoint detector run repeatedly on the same decoded image does not
//! return the same answer twice: coordinates and confidence scores jitter
//! between calls. This crate runs N inference trials over one fixed image and
//! aggregates each keypoint's coordinates via confidence-weighted averaging,
//! producing a more stable estimate of joint positions than any single call.
//!
//! ## Features
//!
//! - **Weighted aggregation** - Per-keypoint confidence-weighted mean over N trials
//! - **ONNX Runtime** - Runs MoveNet single-pose models via ONNX Runtime
//! - **Injectable capability** - Aggregation is generic over any [`PoseSource`],
//!   so tests and custom backends plug in without a real model
//! - **Keypoint filtering** - Drop configured keypoint names from aggregation entirely
//! - **CLI** - `pose-ensemble estimate` for one-shot use from the shell
//!
//! ## Quick Start (Library)
//!
//! The aggregation core needs no model at all — any [`PoseSource`] will do:
//!
//! ```rust
//! use pose_ensemble::{
//!     EnsembleConfig, Keypoint, Pose, ReplaySource, weighted_pose_estimate,
//! };
//!
//! fn main() -> pose_ensemble::Result<()> {
//!     let mut source = ReplaySource::new(vec![
//!         vec![],
//!         vec![Pose::new(vec![Keypoint::new("nose", 10.0, 20.0, 0.5)])],
//!         vec![Pose::new(vec![Keypoint::new("nose", 12.0, 22.0, 0.9)])],
//!     ]);
//!
//!     let config = EnsembleConfig::new().with_trials(3);
//!     let estimate = weighted_pose_estimate(&mut source, &config)?;
//!
//!     let nose = estimate.get("nose").unwrap();
//!     assert!((nose.x - 11.2857).abs() < 1e-3);
//!     assert!((nose.score - 0.4667).abs() < 1e-3);
//!     Ok(())
//! }
//! ```
//!
//! With a real model, bind it to a decoded image:
//!
//! ```no_run
//! use pose_ensemble::{EnsembleConfig, MoveNetModel, decode_image, weighted_pose_estimate};
//!
//! # fn main() -> pose_ensemble::Result<()> {
//! let mut model = MoveNetModel::load("movenet-singlepose-lightning.onnx")?;
//! let image = decode_image("person.jpg")?;
//!
//! let config = EnsembleConfig::new().with_trials(50);
//! let estimate = weighted_pose_estimate(&mut model.bind(&image), &config)?;
//!
//! println!("{}", estimate.verbose());
//! # Ok(())
//! # }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Run 50 trials on an image (default model filename)
//! pose-ensemble estimate --source person.jpg
//!
//! # More trials, distal joints dropped
//! pose-ensemble estimate -s person.jpg --trials 100 \
//!     --exclude left_ankle,right_ankle,left_knee,right_knee
//! ```
//!
//! ## Known Limitation
//!
//! Only the first detected pose per trial is aggregated; the estimator assumes
//! a single-subject image, and multi-person input is out of scope.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregate`] | The weighted multi-trial aggregation core |
//! | [`keypoint`] | [`Keypoint`]/[`Pose`] data model and COCO name tables |
//! | [`config`] | [`EnsembleConfig`] for trials, exclusions, and pacing |
//! | [`source`] | [`PoseSource`] capability seam and test doubles |
//! | [`results`] | Output types ([`PoseEstimate`], [`AggregatedKeypoint`]) |
//! | [`model`] | [`MoveNetModel`] ONNX session wrapper |
//! | [`decode`] | Read-once/decode-once image loading |
//! | [`error`] | Error types ([`EnsembleError`], [`Result`]) |

// Modules
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod keypoint;
pub mod model;
pub mod results;
pub mod source;

// Re-export main types for convenience
pub use aggregate::{
    KeypointAccumulator, weighted_pose_estimate, weighted_pose_estimate_with_pacing,
};
pub use config::EnsembleConfig;
pub use decode::{decode_image, image_to_array};
pub use error::{EnsembleError, Result};
pub use keypoint::{COCO_KEYPOINT_NAMES, DISTAL_KEYPOINTS, Keypoint, Pose};
pub use model::{BoundSource, MoveNetModel};
pub use results::{AggregatedKeypoint, PoseEstimate, Speed, SummaryValue};
pub use source::{FnSource, PoseSource, ReplaySource, from_fn};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
