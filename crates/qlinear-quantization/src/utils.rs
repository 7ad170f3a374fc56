//! Utility functions for quantization operations

/// Minimum and maximum of `data`, skipping NaN. `None` when no value is comparable.
pub fn min_max(data: &[f32]) -> Option<(f32, f32)> {
    data.iter().filter(|v| !v.is_nan()).fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Population standard deviation (`ddof = 0`), accumulated in `f64`.
///
/// Returns NaN for empty input and propagates NaN elements.
pub fn population_std(data: &[f32]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let n = data.len() as f64;
    let mean = data.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let variance = data
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Number of NaN elements.
pub fn count_nan(data: &[f32]) -> usize {
    data.iter().filter(|v| v.is_nan()).count()
}

/// Row-major element positions of slice `index` along `axis`.
///
/// For `dims = [2, 3]` and `axis = 1`, slice 0 covers positions `[0, 3]`.
pub fn axis_slice_positions(dims: &[usize], axis: usize, index: usize) -> Vec<usize> {
    let outer: usize = dims[..axis].iter().product();
    let extent = dims[axis];
    let inner: usize = dims[axis + 1..].iter().product();

    let mut positions = Vec::with_capacity(outer * inner);
    for o in 0..outer {
        let base = (o * extent + index) * inner;
        positions.extend(base..base + inner);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_skips_nan() {
        assert_eq!(min_max(&[3.0, f32::NAN, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(min_max(&[f32::NAN]), None);
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn std_of_known_values() {
        // mean 5, squared deviations sum to 32, n = 8 -> std 2
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std(&data) - 2.0).abs() < 1e-12);
        assert!(population_std(&[]).is_nan());
        assert!(population_std(&[1.0, f32::NAN]).is_nan());
    }

    #[test]
    fn nan_count() {
        assert_eq!(count_nan(&[f32::NAN, 1.0, f32::NAN]), 2);
    }

    #[test]
    fn slice_positions_row_major() {
        let dims = [2, 3];
        assert_eq!(axis_slice_positions(&dims, 0, 1), vec![3, 4, 5]);
        assert_eq!(axis_slice_positions(&dims, 1, 0), vec![0, 3]);
        assert_eq!(axis_slice_positions(&dims, 1, 2), vec![2, 5]);

        let dims = [2, 2, 2];
        assert_eq!(axis_slice_positions(&dims, 1, 1), vec![2, 3, 6, 7]);
    }
}
