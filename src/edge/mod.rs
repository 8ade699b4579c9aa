//! Gradient edge detection for the edge-density feature.
//!
//! The detector follows the classic double-threshold pipeline:
//! 3×3 Sobel gradients with replicated borders, L1 magnitude `|gx| + |gy|`,
//! non-maximum suppression along the gradient direction quantized to
//! 0°/45°/90°/135°, then hysteresis that grows 8-connected edges from pixels
//! above `high` through pixels above `low`.

use crate::image::ImageView;
use crate::trace::{trace_event, trace_span};
use crate::util::{SoilSightError, SoilSightResult};

const TAN_22_5: f64 = 0.414_213_562_373_095_1;
const TAN_67_5: f64 = 2.414_213_562_373_095;

/// Hysteresis thresholds on the L1 gradient magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeParams {
    /// Weak-edge threshold.
    pub low: f64,
    /// Strong-edge threshold.
    pub high: f64,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            low: 50.0,
            high: 150.0,
        }
    }
}

impl EdgeParams {
    pub(crate) fn validate(&self) -> SoilSightResult<()> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low < 0.0 {
            return Err(SoilSightError::InvalidParameter {
                name: "edge thresholds",
                reason: "must be finite and non-negative",
            });
        }
        if self.low > self.high {
            return Err(SoilSightError::InvalidParameter {
                name: "edge thresholds",
                reason: "low must not exceed high",
            });
        }
        Ok(())
    }
}

/// Binary edge map with the shape of the source image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    edges: Vec<bool>,
    width: usize,
    height: usize,
}

impl EdgeMap {
    /// Returns the map width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the map height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if `(x, y)` is an edge pixel.
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.edges[y * self.width + x]
    }

    /// Returns the number of edge pixels.
    pub fn count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count()
    }

    /// Returns the fraction of pixels marked as edges, in `[0, 1]`.
    pub fn density(&self) -> f64 {
        let total = self.width * self.height;
        if total == 0 {
            return 0.0;
        }
        self.count() as f64 / total as f64
    }
}

struct Gradients {
    gx: Vec<i32>,
    gy: Vec<i32>,
    mag: Vec<i32>,
}

fn sobel(image: ImageView<'_, u8>) -> Gradients {
    let w = image.width();
    let h = image.height();
    let px = |x: isize, y: isize| -> i32 {
        let cx = x.clamp(0, w as isize - 1) as usize;
        let cy = y.clamp(0, h as isize - 1) as usize;
        image.get(cx, cy).copied().map_or(0, i32::from)
    };

    let mut gx = vec![0i32; w * h];
    let mut gy = vec![0i32; w * h];
    let mut mag = vec![0i32; w * h];
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as isize, y as isize);
            let dx = -px(xi - 1, yi - 1) + px(xi + 1, yi - 1) - 2 * px(xi - 1, yi)
                + 2 * px(xi + 1, yi)
                - px(xi - 1, yi + 1)
                + px(xi + 1, yi + 1);
            let dy = -px(xi - 1, yi - 1) - 2 * px(xi, yi - 1) - px(xi + 1, yi - 1)
                + px(xi - 1, yi + 1)
                + 2 * px(xi, yi + 1)
                + px(xi + 1, yi + 1);
            let idx = y * w + x;
            gx[idx] = dx;
            gy[idx] = dy;
            mag[idx] = dx.abs() + dy.abs();
        }
    }
    Gradients { gx, gy, mag }
}

/// Runs the detector and returns the edge map.
pub fn detect_edges(image: ImageView<'_, u8>, params: &EdgeParams) -> SoilSightResult<EdgeMap> {
    params.validate()?;
    let w = image.width();
    let h = image.height();
    let grads = sobel(image);

    let mag_at = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            grads.mag[y as usize * w + x as usize]
        }
    };

    // 0 = suppressed, 1 = weak candidate, 2 = strong seed.
    let mut class = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let m = grads.mag[idx];
            if f64::from(m) <= params.low {
                continue;
            }
            let ax = f64::from(grads.gx[idx].abs());
            let ay = f64::from(grads.gy[idx].abs());
            let (xi, yi) = (x as isize, y as isize);
            let (a, b) = if ay < ax * TAN_22_5 {
                (mag_at(xi - 1, yi), mag_at(xi + 1, yi))
            } else if ay > ax * TAN_67_5 {
                (mag_at(xi, yi - 1), mag_at(xi, yi + 1))
            } else if (grads.gx[idx] > 0) == (grads.gy[idx] > 0) {
                (mag_at(xi - 1, yi - 1), mag_at(xi + 1, yi + 1))
            } else {
                (mag_at(xi + 1, yi - 1), mag_at(xi - 1, yi + 1))
            };
            if m > a && m >= b {
                class[idx] = if f64::from(m) > params.high { 2 } else { 1 };
            }
        }
    }

    let mut edges = vec![false; w * h];
    let mut stack: Vec<usize> = class
        .iter()
        .enumerate()
        .filter_map(|(idx, &c)| (c == 2).then_some(idx))
        .collect();
    for &idx in &stack {
        edges[idx] = true;
    }
    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % w) as isize, (idx / w) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if class[nidx] != 0 && !edges[nidx] {
                    edges[nidx] = true;
                    stack.push(nidx);
                }
            }
        }
    }

    Ok(EdgeMap {
        edges,
        width: w,
        height: h,
    })
}

/// Fraction of pixels the detector marks as edges.
pub fn edge_density(image: ImageView<'_, u8>, params: &EdgeParams) -> SoilSightResult<f64> {
    let _span = trace_span!(
        "edge_density",
        width = image.width(),
        height = image.height()
    )
    .entered();
    let map = detect_edges(image, params)?;
    let density = map.density();
    trace_event!("edge_density", edges = map.count(), density = density);
    Ok(density)
}
