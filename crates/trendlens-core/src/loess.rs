//! Locally linear loess smoothing over equally spaced positions.

/// Fitted value at position `xs` from `y[left..=right]`, or `None` when every
/// weight in the window vanishes.
///
/// `span` may exceed `y.len()`; the bandwidth then grows by half the excess.
pub(crate) fn fit_at(y: &[f64], span: usize, xs: f64, left: usize, right: usize) -> Option<f64> {
    let n = y.len();
    let range = n as f64 - 1.0;

    let mut h = (xs - left as f64).max(right as f64 - xs);
    if span > n {
        h += ((span - n) / 2) as f64;
    }
    let upper = 0.999 * h;
    let lower = 0.001 * h;

    let mut weights = vec![0.0; right - left + 1];
    let mut total = 0.0;
    for (offset, weight) in weights.iter_mut().enumerate() {
        let r = ((left + offset) as f64 - xs).abs();
        if r <= upper {
            *weight = if r <= lower {
                1.0
            } else {
                (1.0 - (r / h).powi(3)).powi(3)
            };
            total += *weight;
        }
    }
    if total <= 0.0 {
        return None;
    }
    weights.iter_mut().for_each(|w| *w /= total);

    if h > 0.0 {
        let center: f64 = weights
            .iter()
            .enumerate()
            .map(|(offset, w)| w * (left + offset) as f64)
            .sum();
        let spread: f64 = weights
            .iter()
            .enumerate()
            .map(|(offset, w)| w * ((left + offset) as f64 - center).powi(2))
            .sum();
        if spread.sqrt() > 0.001 * range {
            let slope = (xs - center) / spread;
            for (offset, w) in weights.iter_mut().enumerate() {
                *w *= slope * ((left + offset) as f64 - center) + 1.0;
            }
        }
    }

    Some(
        weights
            .iter()
            .zip(&y[left..=right])
            .map(|(w, value)| w * value)
            .sum(),
    )
}

/// Loess fit at every position, sliding a window of `span` nearest points.
pub(crate) fn smooth(y: &[f64], span: usize) -> Vec<f64> {
    let n = y.len();
    if n < 2 {
        return y.to_vec();
    }

    if span >= n {
        return (0..n)
            .map(|i| fit_at(y, span, i as f64, 0, n - 1).unwrap_or(y[i]))
            .collect();
    }

    let half = (span + 1) / 2;
    let (mut left, mut right) = (0, span - 1);
    let mut fitted = Vec::with_capacity(n);
    for i in 0..n {
        if i + 1 > half && right != n - 1 {
            left += 1;
            right += 1;
        }
        fitted.push(fit_at(y, span, i as f64, left, right).unwrap_or(y[i]));
    }
    fitted
}

/// Trailing moving average; the output is `len - 1` shorter than the input.
pub(crate) fn moving_average(values: &[f64], len: usize) -> Vec<f64> {
    if len == 0 || values.len() < len {
        return Vec::new();
    }
    let scale = len as f64;
    let mut sum: f64 = values[..len].iter().sum();
    let mut out = Vec::with_capacity(values.len() - len + 1);
    out.push(sum / scale);
    for i in len..values.len() {
        sum += values[i] - values[i - len];
        out.push(sum / scale);
    }
    out
}
