//! Convenience helpers for loading pixel buffers via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Decoding sits outside the
//! feature pipeline; these helpers only adapt decoded images to [`PixelBuffer`].

use crate::image::PixelBuffer;
use crate::util::{SoilSightError, SoilSightResult};
use std::path::Path;

/// Creates a pixel buffer from an 8-bit RGB image.
pub fn buffer_from_rgb_image(img: &image::RgbImage) -> SoilSightResult<PixelBuffer> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    PixelBuffer::new(img.as_raw().clone(), width, height)
}

/// Creates a pixel buffer from any decoded image, dropping alpha.
pub fn buffer_from_dynamic_image(img: &image::DynamicImage) -> SoilSightResult<PixelBuffer> {
    buffer_from_rgb_image(&img.to_rgb8())
}

/// Decodes an image file into a pixel buffer.
pub fn load_pixel_buffer<P: AsRef<Path>>(path: P) -> SoilSightResult<PixelBuffer> {
    let img = image::open(path).map_err(|err| SoilSightError::ImageIo {
        reason: err.to_string(),
    })?;
    buffer_from_dynamic_image(&img)
}
