use std::collections::BTreeMap;

use chrono::Datelike;

use crate::data::model::SstSeries;

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Five-number summary of one box plus the points beyond the whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest datum within `q1 - 1.5·IQR`.
    pub whisker_low: f64,
    /// Highest datum within `q3 + 1.5·IQR`.
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let inside = || sorted.iter().copied().filter(|&v| v >= low_fence && v <= high_fence);
        let whisker_low = inside().next().unwrap_or(q1);
        let whisker_high = inside().last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxStats {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Linear-interpolation percentile of already sorted data, `p` in `[0, 100]`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = p / 100.0 * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let frac = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}

/// One box per calendar year, keyed and ordered by year.
pub fn yearly_boxes(series: &SstSeries) -> BTreeMap<i32, BoxStats> {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for rec in &series.records {
        by_year.entry(rec.date.year()).or_default().push(rec.sst_celsius);
    }
    by_year
        .into_iter()
        .filter_map(|(year, values)| BoxStats::from_values(&values).map(|b| (year, b)))
        .collect()
}
