// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;
use std::time::Instant;

use crate::aggregate::weighted_pose_estimate;
use crate::cli::args::EstimateArgs;
use crate::config::EnsembleConfig;
use crate::decode::decode_image;
use crate::keypoint::COCO_KEYPOINT_NAMES;
use crate::model::{DEFAULT_INPUT_SIZE, MoveNetModel};
use crate::{VERSION, error, info, verbose, warn};

/// Run stabilized pose estimation on a single image.
pub fn run_estimate(args: &EstimateArgs) {
    crate::cli::logging::set_verbose(args.verbose);

    let config = EnsembleConfig::new()
        .with_trials(args.trials)
        .with_excluded(args.exclude.iter().cloned());

    if let Err(e) = config.validate() {
        error!("{e}");
        process::exit(1);
    }

    for name in &args.exclude {
        if !COCO_KEYPOINT_NAMES.contains(&name.as_str()) {
            warn!("'{name}' is not a COCO keypoint name; exclusion will have no effect.");
        }
    }

    let input_size = args.input_size.unwrap_or(DEFAULT_INPUT_SIZE);
    let mut model = match MoveNetModel::load_with_input_size(&args.model, input_size) {
        Ok(m) => m,
        Err(e) => {
            error!("Error loading model: {e}");
            process::exit(1);
        }
    };

    let start_decode = Instant::now();
    let image = match decode_image(&args.source) {
        Ok(img) => img,
        Err(e) => {
            error!("Error reading source: {e}");
            process::exit(1);
        }
    };
    let decode_ms = start_decode.elapsed().as_secs_f64() * 1000.0;

    let shape = image.shape();
    println!("pose-ensemble {VERSION} 🚀 MoveNet ONNX");
    verbose!(
        "{}: {}x{} image, {} trials, {} excluded, input {}x{}",
        args.source,
        shape[1],
        shape[0],
        config.num_trials,
        config.excluded.len(),
        model.input_size(),
        model.input_size()
    );
    verbose!("");

    let mut estimate = match weighted_pose_estimate(&mut model.bind(&image), &config) {
        Ok(est) => est,
        Err(e) => {
            error!("Error during estimation: {e}");
            process::exit(1);
        }
    };
    estimate.speed.decode = Some(decode_ms);

    info!("{}", estimate.verbose());

    #[allow(clippy::cast_precision_loss)]
    let per_trial = estimate.speed.trials.unwrap_or(0.0) / estimate.num_trials.max(1) as f64;
    verbose!("");
    verbose!(
        "Speed: {:.1}ms decode, {:.1}ms for {} trials ({:.1}ms/trial)",
        estimate.speed.decode.unwrap_or(0.0),
        estimate.speed.trials.unwrap_or(0.0),
        estimate.num_trials,
        per_trial
    );
}
