// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Image decoding for the trial loop.
//!
//! The input image is read once as raw bytes and decoded once into a 3-channel
//! HWC array before any inference trial runs; every trial then works on the
//! same decoded pixels. The array is owned by the caller and released by
//! normal scope exit.

use std::fs;
use std::path::Path;

use image::DynamicImage;
use ndarray::Array3;

use crate::error::{EnsembleError, Result};

/// Read an image file and decode it to a 3-channel HWC array.
///
/// # Arguments
///
/// * `path` - Path to the image file.
///
/// # Returns
///
/// * An array with shape (height, width, 3) of RGB pixels.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the bytes cannot be decoded.
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<Array3<u8>> {
    let path = path.as_ref();

    let bytes = fs::read(path).map_err(|e| {
        EnsembleError::ImageError(format!("Failed to read image {}: {e}", path.display()))
    })?;

    let img = image::load_from_memory(&bytes).map_err(|e| {
        EnsembleError::ImageError(format!("Failed to decode image {}: {e}", path.display()))
    })?;

    Ok(image_to_array(&img))
}

/// Convert a `DynamicImage` to an HWC u8 array.
#[must_use]
pub fn image_to_array(image: &DynamicImage) -> Array3<u8> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels = rgb.into_raw();

    Array3::from_shape_vec((height as usize, width as usize, 3), pixels)
        .expect("Failed to create array from image pixels")
}

/// Convert an HWC u8 array back to a `DynamicImage`.
///
/// # Errors
///
/// Returns an error if the array does not have 3 channels or its dimensions
/// exceed image limits.
pub fn array_to_image(arr: &Array3<u8>) -> Result<DynamicImage> {
    let shape = arr.shape();
    if shape[2] != 3 {
        return Err(EnsembleError::ImageError(format!(
            "Expected 3-channel array, got {} channels",
            shape[2]
        )));
    }

    let height = u32::try_from(shape[0])
        .map_err(|_| EnsembleError::ImageError("Image height exceeds u32::MAX".to_string()))?;
    let width = u32::try_from(shape[1])
        .map_err(|_| EnsembleError::ImageError("Image width exceeds u32::MAX".to_string()))?;

    let mut rgb_data = Vec::with_capacity((height * width * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            rgb_data.push(arr[[y, x, 0]]);
            rgb_data.push(arr[[y, x, 1]]);
            rgb_data.push(arr[[y, x, 2]]);
        }
    }

    let img_buffer = image::RgbImage::from_raw(width, height, rgb_data).ok_or_else(|| {
        EnsembleError::ImageError("Failed to create image from array".to_string())
    })?;

    Ok(DynamicImage::ImageRgb8(img_buffer))
}
