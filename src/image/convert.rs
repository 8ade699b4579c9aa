//! Color-to-intensity conversions.
//!
//! Gray conversion uses the BT.601 luma weights in 14-bit fixed point:
//! `(4899 * r + 9617 * g + 1868 * b + 8192) >> 14`. The weights sum to
//! `1 << 14`, so a uniform gray pixel maps to itself exactly.

use crate::image::{ImageView, PixelBuffer};
use crate::util::{SoilSightError, SoilSightResult};

const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Owned contiguous single-channel image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl GrayImage {
    /// Wraps a row-major intensity buffer of exactly `width * height` samples.
    pub fn from_vec(data: Vec<u8>, width: usize, height: usize) -> SoilSightResult<Self> {
        if width == 0 || height == 0 {
            return Err(SoilSightError::InvalidImage { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or(SoilSightError::InvalidImage { width, height })?;
        if data.len() != expected {
            return Err(SoilSightError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major intensity samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

/// Converts one RGB triple to an 8-bit luma value.
#[inline]
pub fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb;
    let sum = LUMA_R * u32::from(r) + LUMA_G * u32::from(g) + LUMA_B * u32::from(b);
    ((sum + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// Converts a pixel buffer to a luma image.
pub fn to_gray(buffer: &PixelBuffer) -> SoilSightResult<GrayImage> {
    let data = buffer.pixels().map(luma).collect();
    GrayImage::from_vec(data, buffer.width(), buffer.height())
}

/// Brightness proxy used for moisture: the HSV value channel, `max(r, g, b)`.
#[inline]
pub(crate) fn value_channel(rgb: [u8; 3]) -> u8 {
    rgb[0].max(rgb[1]).max(rgb[2])
}
