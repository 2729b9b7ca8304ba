use chrono::NaiveDate;
use serde::Serialize;

use crate::data::model::SstSeries;
use crate::error::{Result, SstError};

// ---------------------------------------------------------------------------
// Descriptive statistics over the Celsius column
// ---------------------------------------------------------------------------

/// An extremal value together with the date it was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extreme {
    pub celsius: f64,
    pub date: NaiveDate,
    /// Row index in the series.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptive {
    pub count: usize,
    pub year_count: usize,
    pub mean_celsius: f64,
    pub max: Extreme,
    pub min: Extreme,
}

impl Descriptive {
    pub fn compute(series: &SstSeries) -> Result<Self> {
        Ok(Descriptive {
            count: series.len(),
            year_count: year_count(series),
            mean_celsius: mean_celsius(series)?,
            max: max_celsius(series)?,
            min: min_celsius(series)?,
        })
    }
}

/// Number of distinct calendar years present.
pub fn year_count(series: &SstSeries) -> usize {
    series.years().len()
}

/// Arithmetic mean of the Celsius column.
pub fn mean_celsius(series: &SstSeries) -> Result<f64> {
    if series.is_empty() {
        return Err(SstError::EmptySeries);
    }
    let sum: f64 = series.records.iter().map(|r| r.sst_celsius).sum();
    Ok(sum / series.len() as f64)
}

/// Largest Celsius value; ties resolve to the first occurrence.
pub fn max_celsius(series: &SstSeries) -> Result<Extreme> {
    first_extreme(series, |candidate, best| candidate > best)
}

/// Smallest Celsius value; ties resolve to the first occurrence.
pub fn min_celsius(series: &SstSeries) -> Result<Extreme> {
    first_extreme(series, |candidate, best| candidate < best)
}

// Strict comparison keeps the earliest row on ties.
fn first_extreme(series: &SstSeries, better: impl Fn(f64, f64) -> bool) -> Result<Extreme> {
    let mut iter = series.records.iter().enumerate();
    let (index, first) = iter.next().ok_or(SstError::EmptySeries)?;
    let mut best = Extreme {
        celsius: first.sst_celsius,
        date: first.date,
        index,
    };
    for (index, rec) in iter {
        if better(rec.sst_celsius, best.celsius) {
            best = Extreme {
                celsius: rec.sst_celsius,
                date: rec.date,
                index,
            };
        }
    }
    Ok(best)
}
