// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! MoveNet model loading and inference.
//!
//! This module wraps an ONNX Runtime session around a MoveNet single-pose
//! keypoint model and exposes it as a [`PoseSource`] bound to one decoded
//! image. The model reports 17 COCO keypoints as (y, x, score) rows in
//! normalized coordinates; they are mapped back to the original image's pixel
//! space and named from the COCO table.

use std::path::Path;

#[cfg(feature = "coreml")]
use ort::execution_providers::CoreMLExecutionProvider;
use ort::session::Session;
use ort::value::TensorRef;

use image::imageops::FilterType;
use ndarray::{Array3, Array4};

use crate::decode::array_to_image;
use crate::error::{EnsembleError, Result};
use crate::keypoint::{COCO_KEYPOINT_NAMES, Keypoint, Pose};
use crate::source::PoseSource;

/// Default MoveNet model filename.
pub const DEFAULT_MODEL: &str = "movenet-singlepose-lightning.onnx";

/// Input resolution of the MoveNet lightning variant.
pub const DEFAULT_INPUT_SIZE: usize = 192;

/// MoveNet single-pose model for keypoint inference.
///
/// # Example
///
/// ```no_run
/// use pose_ensemble::{EnsembleConfig, MoveNetModel, decode_image, weighted_pose_estimate};
///
/// # fn main() -> pose_ensemble::Result<()> {
/// let mut model = MoveNetModel::load("movenet-singlepose-lightning.onnx")?;
/// let image = decode_image("person.jpg")?;
/// let estimate = weighted_pose_estimate(&mut model.bind(&image), &EnsembleConfig::new())?;
/// println!("{}", estimate.verbose());
/// # Ok(())
/// # }
/// ```
pub struct MoveNetModel {
    /// ONNX Runtime session.
    session: Session,
    /// Input tensor name.
    input_name: String,
    /// Output tensor names.
    output_names: Vec<String>,
    /// Square input resolution the model expects.
    input_size: usize,
}

impl MoveNetModel {
    /// Load a MoveNet model from an ONNX file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the ONNX model file.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file doesn't exist or can't be loaded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_input_size(path, DEFAULT_INPUT_SIZE)
    }

    /// Load a MoveNet model with an explicit input resolution.
    ///
    /// The thunder variant takes 256x256 input; lightning takes 192x192.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file doesn't exist or can't be loaded.
    pub fn load_with_input_size<P: AsRef<Path>>(path: P, input_size: usize) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(EnsembleError::ModelLoadError(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        if input_size == 0 {
            return Err(EnsembleError::ConfigError(
                "input_size must be at least 1".to_string(),
            ));
        }

        #[allow(unused_mut)]
        let mut builder = Session::builder().map_err(|e| {
            EnsembleError::ModelLoadError(format!("Failed to create session builder: {e}"))
        })?;

        #[cfg(feature = "coreml")]
        {
            builder = builder
                .with_execution_providers([CoreMLExecutionProvider::default().build()])
                .map_err(|e| {
                    EnsembleError::ModelLoadError(format!("Failed to register CoreML EP: {e}"))
                })?;
        }

        let session = builder
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| {
                EnsembleError::ModelLoadError(format!("Failed to set optimization level: {e}"))
            })?
            .commit_from_file(path)
            .map_err(|e| EnsembleError::ModelLoadError(format!("Failed to load model: {e}")))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        Ok(Self {
            session,
            input_name,
            output_names,
            input_size,
        })
    }

    /// Get the model's square input resolution.
    #[must_use]
    pub const fn input_size(&self) -> usize {
        self.input_size
    }

    /// Run one inference trial on a decoded image.
    ///
    /// # Arguments
    ///
    /// * `image` - Decoded image as an HWC (height, width, 3) u8 array.
    ///
    /// # Returns
    ///
    /// The detected poses; MoveNet single-pose reports at most one.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is malformed or inference fails.
    pub fn estimate_poses(&mut self, image: &Array3<u8>) -> Result<Vec<Pose>> {
        let shape = image.shape();
        if shape[2] != 3 {
            return Err(EnsembleError::ImageError(format!(
                "Expected 3-channel image, got {} channels",
                shape[2]
            )));
        }

        #[allow(clippy::cast_precision_loss)]
        let (orig_h, orig_w) = (shape[0] as f32, shape[1] as f32);

        let input = self.build_input_tensor(image)?;
        let (data, out_shape) = self.run_inference(&input)?;

        let poses = Self::decode_output(&data, &out_shape, orig_w, orig_h)?;
        Ok(poses)
    }

    /// Bind this model to a fixed decoded image, producing a [`PoseSource`].
    pub fn bind<'a>(&'a mut self, image: &'a Array3<u8>) -> BoundSource<'a> {
        BoundSource { model: self, image }
    }

    /// Resize the image to the model resolution and build the NHWC i32 tensor.
    fn build_input_tensor(&self, image: &Array3<u8>) -> Result<Array4<i32>> {
        let size = self.input_size;

        #[allow(clippy::cast_possible_truncation)]
        let resized = array_to_image(image)?
            .resize_exact(size as u32, size as u32, FilterType::Triangle)
            .to_rgb8();

        let mut tensor = Array4::<i32>::zeros((1, size, size, 3));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            tensor[[0, y, x, 0]] = i32::from(pixel[0]);
            tensor[[0, y, x, 1]] = i32::from(pixel[1]);
            tensor[[0, y, x, 2]] = i32::from(pixel[2]);
        }

        Ok(tensor)
    }

    /// Run the ONNX session on a prepared input tensor.
    fn run_inference(&mut self, input: &Array4<i32>) -> Result<(Vec<f32>, Vec<usize>)> {
        let input_contiguous = input.as_standard_layout();

        let input_tensor = TensorRef::from_array_view(&input_contiguous).map_err(|e| {
            EnsembleError::InferenceError(format!("Failed to create input tensor: {e}"))
        })?;

        let inputs = ort::inputs![&self.input_name => input_tensor];

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| EnsembleError::InferenceError(format!("Inference failed: {e}")))?;

        let output_name = self
            .output_names
            .first()
            .ok_or_else(|| EnsembleError::InferenceError("Model has no outputs".to_string()))?;
        let output = outputs.get(output_name.as_str()).ok_or_else(|| {
            EnsembleError::InferenceError(format!("Output '{output_name}' not found"))
        })?;

        let (shape, data) = output.try_extract_tensor::<f32>().map_err(|e| {
            EnsembleError::InferenceError(format!("Failed to extract output: {e}"))
        })?;

        #[allow(clippy::cast_sign_loss)]
        let shape_vec: Vec<usize> = shape.iter().map(|&d| d as usize).collect();

        Ok((data.to_vec(), shape_vec))
    }

    /// Decode `[1, 1, K, 3]` rows of normalized (y, x, score) into named
    /// keypoints in original-image pixel space.
    fn decode_output(
        data: &[f32],
        shape: &[usize],
        orig_w: f32,
        orig_h: f32,
    ) -> Result<Vec<Pose>> {
        if shape.last() != Some(&3) || data.len() % 3 != 0 {
            return Err(EnsembleError::InferenceError(format!(
                "Unexpected output shape {shape:?}, expected trailing (y, x, score) rows"
            )));
        }

        let num_keypoints = data.len() / 3;
        if num_keypoints == 0 {
            return Ok(vec![]);
        }

        let mut keypoints = Vec::with_capacity(num_keypoints);
        for k in 0..num_keypoints {
            let y = data[k * 3];
            let x = data[k * 3 + 1];
            let score = data[k * 3 + 2];

            let name = COCO_KEYPOINT_NAMES
                .get(k)
                .map_or_else(|| format!("keypoint_{k}"), ToString::to_string);

            keypoints.push(Keypoint::new(name, x * orig_w, y * orig_h, score));
        }

        Ok(vec![Pose::new(keypoints)])
    }
}

impl std::fmt::Debug for MoveNetModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveNetModel")
            .field("input_name", &self.input_name)
            .field("input_size", &self.input_size)
            .finish_non_exhaustive()
    }
}

/// A model bound to one fixed decoded image.
///
/// Each [`estimate`](PoseSource::estimate) call runs a fresh inference trial
/// on the same pixels.
pub struct BoundSource<'a> {
    model: &'a mut MoveNetModel,
    image: &'a Array3<u8>,
}

impl PoseSource for BoundSource<'_> {
    fn estimate(&mut self) -> Result<Vec<Pose>> {
        self.model.estimate_poses(self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_not_found() {
        let result = MoveNetModel::load("nonexistent.onnx");
        assert!(matches!(
            result.unwrap_err(),
            EnsembleError::ModelLoadError(_)
        ));
    }

    #[test]
    fn test_decode_output_names_and_scaling() {
        // Two keypoints of a hypothetical 2-point model, normalized coords.
        let data = [0.5, 0.25, 0.9, 1.0, 1.0, 0.1];
        let poses = MoveNetModel::decode_output(&data, &[1, 1, 2, 3], 400.0, 200.0).unwrap();

        assert_eq!(poses.len(), 1);
        let pose = &poses[0];
        assert_eq!(pose.len(), 2);

        let nose = pose.get("nose").unwrap();
        assert!((nose.x - 100.0).abs() < 1e-4);
        assert!((nose.y - 100.0).abs() < 1e-4);
        assert!((nose.score - 0.9).abs() < 1e-6);

        let eye = pose.get("left_eye").unwrap();
        assert!((eye.x - 400.0).abs() < 1e-4);
        assert!((eye.y - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_decode_output_bad_shape() {
        let data = [0.5, 0.25];
        let result = MoveNetModel::decode_output(&data, &[1, 2], 100.0, 100.0);
        assert!(matches!(
            result.unwrap_err(),
            EnsembleError::InferenceError(_)
        ));
    }

    #[test]
    fn test_decode_output_overflow_names() {
        // More keypoints than the COCO table falls back to indexed names.
        let data = vec![0.0; 18 * 3];
        let poses = MoveNetModel::decode_output(&data, &[1, 1, 18, 3], 100.0, 100.0).unwrap();
        assert_eq!(poses[0].keypoints[17].name, "keypoint_17");
    }
}
