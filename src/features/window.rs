//! Windowed computations over a single (store, item) group
//!
//! These helpers operate on one group's sales values in row order. Missing
//! results (insufficient history) come back as `None`; callers scatter the
//! values back into the full feature frame.

/// Value `lag` rows earlier within the group, `None` for the first `lag` rows
pub(crate) fn lagged(series: &[f64], lag: usize) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|pos| {
            if pos >= lag {
                Some(series[pos - lag])
            } else {
                None
            }
        })
        .collect()
}

/// Triangular window weights matching `scipy.signal.triang`.
///
/// Odd windows peak on a single center weight, even windows on a flat pair.
/// Only the shape matters here since weighted means normalize by the weight
/// sum over the values actually present.
pub(crate) fn triangular_weights(window: usize) -> Vec<f64> {
    (0..window)
        .map(|j| {
            if window % 2 == 1 {
                (j + 1).min(window - j) as f64
            } else {
                (2 * j + 1).min(2 * (window - j) - 1) as f64
            }
        })
        .collect()
}

/// Triangular-weighted rolling mean of the series shifted by one row.
///
/// The window for row `pos` covers the `window` rows ending at `pos - 1`,
/// so the current row's own value never feeds its own feature. Rows with
/// fewer than `min_periods` values in the window come back as `None`.
pub(crate) fn shifted_triangular_mean(
    series: &[f64],
    window: usize,
    min_periods: usize,
) -> Vec<Option<f64>> {
    let weights = triangular_weights(window);

    (0..series.len())
        .map(|pos| {
            // weight j lines up with series index pos - window + j
            let mut weighted_sum = 0.0;
            let mut weight_sum = 0.0;
            let mut count = 0usize;
            for (j, w) in weights.iter().enumerate() {
                let idx = pos as i64 - window as i64 + j as i64;
                if idx >= 0 {
                    weighted_sum += w * series[idx as usize];
                    weight_sum += w;
                    count += 1;
                }
            }
            if count >= min_periods && weight_sum > 0.0 {
                Some(weighted_sum / weight_sum)
            } else {
                None
            }
        })
        .collect()
}

/// Exponentially weighted mean of the series shifted by `lag` rows.
///
/// Uses the unadjusted recursive form `y = alpha * x + (1 - alpha) * y`,
/// seeded with the first shifted-in value. The first `lag` rows have no
/// shifted value and come back as `None`.
pub(crate) fn shifted_ewm(series: &[f64], alpha: f64, lag: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; series.len()];
    let mut state: Option<f64> = None;

    for pos in lag..series.len() {
        let x = series[pos - lag];
        let y = match state {
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
            None => x,
        };
        state = Some(y);
        out[pos] = Some(y);
    }

    out
}
