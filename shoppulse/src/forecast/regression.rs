//! Ordinary least-squares trend fit and in-sample fit-quality metrics

/// Fitted line `y ≈ slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit an OLS line over `(x, y)` pairs. Requires at least two points with
/// distinct x values; with zero x-variance the line is flat at the y mean.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> TrendLine {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxx += (x - x_mean) * (x - x_mean);
        sxy += (x - x_mean) * (y - y_mean);
    }

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    TrendLine {
        slope,
        intercept: y_mean - slope * x_mean,
    }
}

/// Coefficient of determination over the training data.
///
/// When the observed series has zero variance, R² is 1 for a perfect fit and
/// 0 otherwise (residual error cannot be expressed as a share of none).
pub fn r_squared(ys: &[f64], predicted: &[f64]) -> f64 {
    let n = ys.len() as f64;
    let y_mean = ys.iter().sum::<f64>() / n;

    let ss_tot: f64 = ys.iter().map(|y| (y - y_mean) * (y - y_mean)).sum();
    let ss_res: f64 = ys
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p) * (y - p))
        .sum();

    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Mean absolute percentage error over the training data, as a fraction.
///
/// Zero-quantity days are skipped (a percentage of zero is undefined); if no
/// nonzero day exists the error is reported as 1, i.e. zero confidence.
pub fn mape(ys: &[f64], predicted: &[f64]) -> f64 {
    let mut total = 0.0;
    let mut counted = 0usize;
    for (y, p) in ys.iter().zip(predicted) {
        if *y != 0.0 {
            total += ((y - p) / y).abs();
            counted += 1;
        }
    }
    if counted == 0 {
        1.0
    } else {
        total / counted as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0];
        let line = fit_line(&xs, &ys);
        assert!((line.slope - 2.0).abs() < 1e-9);
        assert!((line.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_fits_zero_slope() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [4.0, 4.0, 4.0];
        let line = fit_line(&xs, &ys);
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 4.0);
    }

    #[test]
    fn r_squared_is_one_for_perfect_fit() {
        let ys = [3.0, 5.0, 7.0];
        assert_eq!(r_squared(&ys, &ys), 1.0);
    }

    #[test]
    fn r_squared_is_zero_for_mean_prediction() {
        let ys = [2.0, 4.0, 6.0];
        let predicted = [4.0, 4.0, 4.0];
        assert!(r_squared(&ys, &predicted).abs() < 1e-9);
    }

    #[test]
    fn mape_skips_zero_days() {
        let ys = [0.0, 10.0];
        let predicted = [5.0, 9.0];
        assert!((mape(&ys, &predicted) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn mape_with_all_zero_days_is_total_error() {
        let ys = [0.0, 0.0];
        let predicted = [1.0, 2.0];
        assert_eq!(mape(&ys, &predicted), 1.0);
    }
}
