//! Numeric helpers for statistics and classification.

/// Running first and second moments for population statistics.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Moments {
    count: u64,
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    pub(crate) fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    /// Returns `(mean, population std)` or `None` if empty or non-finite.
    pub(crate) fn mean_std(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        // Cancellation can push the variance slightly below zero.
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        let std = variance.sqrt();
        if mean.is_finite() && std.is_finite() {
            Some((mean, std))
        } else {
            None
        }
    }
}

/// Returns the index and probability of the most likely class.
///
/// Ties resolve to the lowest index. Returns `None` for empty or non-finite
/// logits.
pub(crate) fn softmax_argmax(logits: &[f64]) -> Option<(usize, f64)> {
    let mut best_idx = 0usize;
    let mut best = f64::NEG_INFINITY;
    for (idx, &logit) in logits.iter().enumerate() {
        if !logit.is_finite() {
            return None;
        }
        if logit > best {
            best = logit;
            best_idx = idx;
        }
    }
    if logits.is_empty() {
        return None;
    }

    let denom: f64 = logits.iter().map(|&l| (l - best).exp()).sum();
    Some((best_idx, 1.0 / denom))
}
