//! Original Mann–Kendall monotonic trend test.
//!
//! The test works on the *ordered* values only and assumes a fixed sampling
//! cadence: dates are never looked at. Serial correlation is not corrected
//! for; variance-corrected variants (Hamed–Rao, Yue–Wang) or pre-whitening
//! would be separate tests on top of the same `S` statistic.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Result, SstError};

/// Significance level used when none is configured.
pub const DEFAULT_ALPHA: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
    NoTrend,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::NoTrend => write!(f, "no trend"),
        }
    }
}

// Reports carry the same labels as the console.
impl Serialize for Trend {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Everything the test reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MannKendall {
    pub trend: Trend,
    /// Whether the trend is significant at `alpha`.
    pub h: bool,
    pub p_value: f64,
    pub z: f64,
    /// Kendall's tau.
    pub tau: f64,
    pub s: f64,
    pub var_s: f64,
    /// Theil–Sen slope, in value units per step.
    pub slope: f64,
    /// Kendall–Theil intercept for the step index axis.
    pub intercept: f64,
    pub alpha: f64,
}

/// Run the original Mann–Kendall test over `values` in the given order.
pub fn original_test(values: &[f64], alpha: f64) -> Result<MannKendall> {
    let n = values.len();
    if n < 2 {
        return Err(SstError::InsufficientData {
            operation: "Mann-Kendall test",
            needed: "at least 2 values",
            got: n.to_string(),
        });
    }

    let s = s_statistic(values);
    let var_s = variance_s(values);
    let z = z_score(s, var_s);

    let normal = Normal::new(0.0, 1.0).map_err(|e| SstError::InsufficientData {
        operation: "Mann-Kendall test",
        needed: "a standard normal distribution",
        got: e.to_string(),
    })?;
    let p_value = 2.0 * (1.0 - normal.cdf(z.abs()));
    let h = z.abs() > normal.inverse_cdf(1.0 - alpha / 2.0);

    let trend = match (h, z.partial_cmp(&0.0)) {
        (true, Some(Ordering::Greater)) => Trend::Increasing,
        (true, Some(Ordering::Less)) => Trend::Decreasing,
        _ => Trend::NoTrend,
    };

    let nf = n as f64;
    let tau = s / (0.5 * nf * (nf - 1.0));
    let (slope, intercept) = sens_slope(values);

    Ok(MannKendall {
        trend,
        h,
        p_value,
        z,
        tau,
        s,
        var_s,
        slope,
        intercept,
        alpha,
    })
}

/// `S = Σ_{i<j} sign(x_j − x_i)`.
pub fn s_statistic(values: &[f64]) -> f64 {
    let mut s: i64 = 0;
    for (i, &xi) in values.iter().enumerate() {
        for &xj in &values[i + 1..] {
            s += match xj.partial_cmp(&xi) {
                Some(Ordering::Greater) => 1,
                Some(Ordering::Less) => -1,
                _ => 0,
            };
        }
    }
    s as f64
}

/// Variance of `S` under the null hypothesis, corrected for tie groups.
pub fn variance_s(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let base = n * (n - 1.0) * (2.0 * n + 5.0);
    let ties: f64 = tie_group_sizes(values)
        .into_iter()
        .filter(|&t| t > 1)
        .map(|t| {
            let t = t as f64;
            t * (t - 1.0) * (2.0 * t + 5.0)
        })
        .sum();
    (base - ties) / 18.0
}

fn tie_group_sizes(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut sizes = Vec::new();
    let mut run = 0usize;
    for (i, v) in sorted.iter().enumerate() {
        if i > 0 && *v != sorted[i - 1] {
            sizes.push(run);
            run = 0;
        }
        run += 1;
    }
    if run > 0 {
        sizes.push(run);
    }
    sizes
}

/// Continuity-corrected normal score of `S`.
pub fn z_score(s: f64, var_s: f64) -> f64 {
    if s > 0.0 {
        (s - 1.0) / var_s.sqrt()
    } else if s < 0.0 {
        (s + 1.0) / var_s.sqrt()
    } else {
        0.0
    }
}

/// Theil–Sen slope and the matching Kendall–Theil intercept over step
/// indices `0..n`.
pub fn sens_slope(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    let mut slopes = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            slopes.push((values[j] - values[i]) / (j - i) as f64);
        }
    }
    let slope = median(&mut slopes);
    let mut sorted = values.to_vec();
    let intercept = median(&mut sorted) - (n as f64 - 1.0) / 2.0 * slope;
    (slope, intercept)
}

/// Median with averaging of the two middle elements; NaN for empty input.
/// Reorders `values`.
pub fn median(values: &mut [f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        upper
    } else {
        let below = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (below + upper) / 2.0
    }
}
