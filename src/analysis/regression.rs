//! Ordinary least-squares fit of a straight line, `y = intercept + slope·x`.
//!
//! Closed-form slope/intercept from the centred sums of squares, Pearson's r,
//! and a two-sided p-value for the null hypothesis `slope == 0` from a
//! Student t distribution with `n − 2` degrees of freedom.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::data::model::SstSeries;
use crate::error::{Result, SstError};

/// Guards the t statistic against division by zero when |r| == 1.
const TINY: f64 = 1.0e-20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// °C per day when fitted against day numbers.
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub r_value: f64,
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
    pub intercept_std_err: f64,
    pub n: usize,
}

impl LinearFit {
    /// Value of the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit Celsius against day numbers (days since 1970-01-01).
pub fn fit_series(series: &SstSeries) -> Result<LinearFit> {
    linear_regression(&series.day_numbers(), &series.celsius())
}

/// Least-squares regression of `y` on `x`.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    let n = x.len();
    if n != y.len() {
        return Err(SstError::InsufficientData {
            operation: "linear regression",
            needed: "x and y of equal length",
            got: format!("{} x and {} y values", n, y.len()),
        });
    }
    if n < 2 {
        return Err(SstError::InsufficientData {
            operation: "linear regression",
            needed: "at least 2 points",
            got: n.to_string(),
        });
    }

    let nf = n as f64;
    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 {
        return Err(SstError::InsufficientData {
            operation: "linear regression",
            needed: "at least two distinct x values",
            got: "identical x values".to_string(),
        });
    }

    let r_value = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let (p_value, std_err, intercept_std_err) = if n == 2 {
        let p = if y[0] == y[1] { 1.0 } else { 0.0 };
        (p, 0.0, 0.0)
    } else {
        let df = nf - 2.0;
        let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
        let p = match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => 2.0 * dist.sf(t.abs()),
            Err(_) => f64::NAN,
        };
        // Population moments, matching the closed-form standard error.
        let ssxm = sxx / nf;
        let ssym = syy / nf;
        let std_err = ((1.0 - r_value * r_value) * ssym / ssxm / df).sqrt();
        let intercept_std_err = std_err * (ssxm + x_mean * x_mean).sqrt();
        (p, std_err, intercept_std_err)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
        intercept_std_err,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_exact_line_is_recovered() {
        let a = 12.5;
        let b = 0.0025;
        let x: Vec<f64> = (18_000..18_400).map(|d| d as f64).collect();
        let y: Vec<f64> = x.iter().map(|&d| a + b * d).collect();

        let fit = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, b, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept, a, epsilon = 1e-6);
        assert_relative_eq!(fit.r_value, 1.0, epsilon = 1e-12);
        assert!(fit.p_value < 1e-12);
        assert_abs_diff_eq!(fit.std_err, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_three_point_example() {
        let x = [18262.0, 18263.0, 18264.0];
        let y = [10.0, 15.0, 20.0];
        let fit = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 5.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 10.0 - 5.0 * 18262.0, epsilon = 1e-9);
        assert_relative_eq!(fit.predict(18263.0), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_noisy_fit_matches_reference() {
        // Reference values from a textbook least-squares fit.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 0.6, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 2.2, epsilon = 1e-12);
        assert_relative_eq!(fit.r_value, 0.774_596_669_241_483_4, epsilon = 1e-12);
        assert_relative_eq!(fit.std_err, 0.282_842_712_474_619, epsilon = 1e-9);
        assert_relative_eq!(fit.p_value, 0.124_027_062_657_554_6, epsilon = 1e-6);
    }

    #[test]
    fn test_flat_y_has_zero_correlation() {
        let fit = linear_regression(&[1.0, 2.0, 3.0, 4.0], &[7.0; 4]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_value, 0.0);
        assert_relative_eq!(fit.p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_points() {
        let fit = linear_regression(&[0.0, 1.0], &[1.0, 3.0]).unwrap();
        assert_eq!(fit.slope, 2.0);
        assert_eq!(fit.p_value, 0.0);
        assert_eq!(fit.std_err, 0.0);
        let flat = linear_regression(&[0.0, 1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(flat.p_value, 1.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(linear_regression(&[1.0], &[1.0]).is_err());
        assert!(linear_regression(&[1.0, 2.0], &[1.0]).is_err());
        assert!(matches!(
            linear_regression(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]),
            Err(SstError::InsufficientData { .. })
        ));
    }
}
