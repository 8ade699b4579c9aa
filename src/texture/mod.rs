//! Neighbor-comparison texture codes.
//!
//! For every pixel at least `radius` away from all borders, `samples` points
//! are taken on a circle around it at angles `k * 2π / samples`. The row offset
//! is `radius * cos(θ)` and the column offset `radius * sin(θ)`, each snapped to
//! a whole pixel (no interpolation). Bit `k` of the code is set when the sample
//! is at least as bright as the center. Pixels closer than `radius` to an edge
//! receive code 0, so the code grid always has the input's shape.

use crate::image::ImageView;
use crate::trace::{trace_event, trace_span};
use crate::util::math::Moments;
use crate::util::{SoilSightError, SoilSightResult};

#[cfg(feature = "rayon")]
pub mod rayon;

/// Largest supported sample count; codes are stored as `u32`.
pub const MAX_SAMPLES: usize = 32;

/// How sample offsets are snapped to the pixel grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SampleRounding {
    /// Round half away from zero.
    #[default]
    Nearest,
    /// Truncate toward zero.
    TowardZero,
}

impl SampleRounding {
    fn apply(self, value: f64) -> isize {
        match self {
            SampleRounding::Nearest => value.round() as isize,
            SampleRounding::TowardZero => value.trunc() as isize,
        }
    }
}

/// Sampling parameters for the texture encoder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureParams {
    /// Circle radius in pixels; also the width of the zero border.
    pub radius: usize,
    /// Number of samples (bits) per code.
    pub samples: usize,
    /// Offset snapping mode.
    pub rounding: SampleRounding,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            radius: 1,
            samples: 8,
            rounding: SampleRounding::Nearest,
        }
    }
}

/// Precomputed sample offsets for one parameter set.
#[derive(Clone, Debug)]
pub struct TexturePlan {
    radius: usize,
    /// `(row, column)` offsets, indexed by bit position.
    offsets: Vec<(isize, isize)>,
}

impl TexturePlan {
    /// Validates parameters and precomputes the sample ring.
    pub fn new(params: &TextureParams) -> SoilSightResult<Self> {
        if params.radius == 0 {
            return Err(SoilSightError::InvalidParameter {
                name: "radius",
                reason: "must be at least 1",
            });
        }
        if params.samples == 0 || params.samples > MAX_SAMPLES {
            return Err(SoilSightError::InvalidParameter {
                name: "samples",
                reason: "must be in 1..=32",
            });
        }

        let r = params.radius as f64;
        let n = params.samples as f64;
        let offsets = (0..params.samples)
            .map(|k| {
                let theta = 2.0 * std::f64::consts::PI * k as f64 / n;
                let dy = params.rounding.apply(r * theta.cos());
                let dx = params.rounding.apply(r * theta.sin());
                (dy, dx)
            })
            .collect();

        Ok(Self {
            radius: params.radius,
            offsets,
        })
    }

    /// Returns the border width that receives code 0.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Returns the number of bits per code.
    pub fn samples(&self) -> usize {
        self.offsets.len()
    }

    /// Returns `(row, column)` sample offsets indexed by bit.
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    /// Returns the largest representable code, `2^samples - 1`.
    pub fn max_code(&self) -> u32 {
        if self.offsets.len() >= 32 {
            u32::MAX
        } else {
            (1u32 << self.offsets.len()) - 1
        }
    }

    /// Returns `true` if `(x, y)` is far enough from every edge to be encoded.
    fn is_interior(&self, width: usize, height: usize, x: usize, y: usize) -> bool {
        let r = self.radius;
        x >= r && y >= r && x + r < width && y + r < height
    }

    fn code_at(&self, image: ImageView<'_, u8>, x: usize, y: usize) -> u32 {
        let Some(&center) = image.get(x, y) else {
            return 0;
        };
        let mut code = 0u32;
        for (bit, &(dy, dx)) in self.offsets.iter().enumerate() {
            let sx = x.checked_add_signed(dx);
            let sy = y.checked_add_signed(dy);
            let sample = match (sx, sy) {
                (Some(sx), Some(sy)) => image.get(sx, sy).copied().unwrap_or(0),
                _ => 0,
            };
            if sample >= center {
                code |= 1 << bit;
            }
        }
        code
    }

    /// Encodes row `y` into `out`, which must hold `image.width()` codes.
    pub(crate) fn encode_row(&self, image: ImageView<'_, u8>, y: usize, out: &mut [u32]) {
        let width = image.width();
        let height = image.height();
        for (x, slot) in out.iter_mut().enumerate().take(width) {
            *slot = if self.is_interior(width, height, x, y) {
                self.code_at(image, x, y)
            } else {
                0
            };
        }
    }
}

/// Owned grid of texture codes with the same shape as the encoded image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureCodes {
    data: Vec<u32>,
    width: usize,
    height: usize,
}

impl TextureCodes {
    pub(crate) fn from_vec(data: Vec<u32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the grid width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major codes.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Returns the code at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Mean and population standard deviation over every cell, border included.
    pub fn mean_std(&self) -> Option<(f64, f64)> {
        let mut moments = Moments::default();
        for &code in &self.data {
            moments.push(f64::from(code));
        }
        moments.mean_std()
    }
}

/// Encodes an intensity grid with the given parameters.
pub fn encode(image: ImageView<'_, u8>, params: &TextureParams) -> SoilSightResult<TextureCodes> {
    let plan = TexturePlan::new(params)?;
    Ok(encode_with_plan(image, &plan))
}

/// Encodes an intensity grid with a precomputed plan.
pub fn encode_with_plan(image: ImageView<'_, u8>, plan: &TexturePlan) -> TextureCodes {
    let width = image.width();
    let height = image.height();
    let _span = trace_span!("texture_encode", width = width, height = height).entered();

    let mut data = vec![0u32; width * height];
    for (y, row) in data.chunks_exact_mut(width).enumerate() {
        plan.encode_row(image, y, row);
    }

    trace_event!("texture_encoded", samples = plan.samples(), radius = plan.radius());
    TextureCodes::from_vec(data, width, height)
}
