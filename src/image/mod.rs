//! Pixel buffers and borrowed 2D grid views.
//!
//! `PixelBuffer` is the decoded image handed to the core: a row-major grid of
//! interleaved RGB samples. `ImageView` is a borrowed 2D view into a 1D buffer
//! with an explicit stride, used for single-channel intensity and code grids.
//! The stride counts elements between the starts of consecutive rows.

use crate::util::{SoilSightError, SoilSightResult};

pub mod convert;
#[cfg(feature = "image-io")]
pub mod io;

pub use convert::{luma, to_gray, GrayImage};

/// Number of interleaved samples per pixel in a [`PixelBuffer`].
pub const CHANNELS: usize = 3;

/// Decoded RGB image, 8 bits per channel, row-major and tightly packed.
///
/// Zero-area buffers can be constructed (they are valid data) but are
/// rejected by feature extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Wraps interleaved RGB samples; `data.len()` must equal `width * height * 3`.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> SoilSightResult<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(CHANNELS))
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

    /// Builds a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> SoilSightResult<Self>
    where
        F: FnMut(usize, usize) -> [u8; 3],
    {
        let len = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or(SoilSightError::InvalidImage { width, height })?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Builds a buffer where every pixel has the same color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> SoilSightResult<Self> {
        Self::from_fn(width, height, |_, _| rgb)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` when the buffer has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the interleaved sample slice.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Returns the `[r, g, b]` triple at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * CHANNELS;
        let px = self.data.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2]])
    }

    /// Iterates over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|px| [px[0], px[1], px[2]])
    }

    /// Returns the interleaved samples of row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width * CHANNELS;
        self.data.get(start..start + self.width * CHANNELS)
    }
}

/// Borrowed 2D grid view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> SoilSightResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> SoilSightResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(SoilSightError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the grid width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> SoilSightResult<usize> {
    if width == 0 || height == 0 {
        return Err(SoilSightError::InvalidImage { width, height });
    }
    if stride < width {
        return Err(SoilSightError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(SoilSightError::InvalidImage { width, height })
}
