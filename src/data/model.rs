use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

// ---------------------------------------------------------------------------
// Observation – one raw row of the source export
// ---------------------------------------------------------------------------

/// A single raw row: the timestamp is kept as text until normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// ISO-8601 UTC timestamp, e.g. `2020-01-01T09:00:00.000000Z`.
    pub timestamp: String,
    pub sst_kelvin: f64,
}

// ---------------------------------------------------------------------------
// NormalizedRecord – one row of the cleaned table
// ---------------------------------------------------------------------------

/// A daily record after timestamp truncation and unit conversion.
///
/// The serde names are the user-facing column labels of the exported CSV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(rename = "Dates")]
    pub date: NaiveDate,
    #[serde(rename = "SST_Kelvin")]
    pub sst_kelvin: f64,
    #[serde(rename = "SST_Celsius")]
    pub sst_celsius: f64,
}

impl NormalizedRecord {
    pub fn from_kelvin(date: NaiveDate, sst_kelvin: f64) -> Self {
        NormalizedRecord {
            date,
            sst_kelvin,
            sst_celsius: sst_kelvin - KELVIN_OFFSET,
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric date axis
// ---------------------------------------------------------------------------

/// Epoch of the numeric date axis shared by the regression and the plots.
pub fn date_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Days elapsed since 1970-01-01, as used on every x axis.
pub fn day_number(date: NaiveDate) -> f64 {
    (date - date_epoch()).num_days() as f64
}

/// Inverse of [`day_number`], truncating any fractional day.
pub fn date_from_day_number(day: f64) -> Option<NaiveDate> {
    date_epoch().checked_add_signed(Duration::days(day.floor() as i64))
}

// ---------------------------------------------------------------------------
// SstSeries – the complete normalized table
// ---------------------------------------------------------------------------

/// The normalized daily series, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SstSeries {
    pub records: Vec<NormalizedRecord>,
}

impl SstSeries {
    pub fn new(records: Vec<NormalizedRecord>) -> Self {
        SstSeries { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Celsius values in source order.
    pub fn celsius(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.sst_celsius).collect()
    }

    /// Day numbers of every record, in source order.
    pub fn day_numbers(&self) -> Vec<f64> {
        self.records.iter().map(|r| day_number(r.date)).collect()
    }

    /// Sorted set of calendar years present.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|r| r.date.year()).collect()
    }

    /// `(min, max)` of the Celsius column, `None` when empty.
    pub fn celsius_range(&self) -> Option<(f64, f64)> {
        let mut values = self.records.iter().map(|r| r.sst_celsius);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// `(first, last)` date by value, `None` when empty.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_number_epoch() {
        assert_eq!(day_number(ymd(1970, 1, 1)), 0.0);
        assert_eq!(day_number(ymd(2020, 1, 1)), 18262.0);
        assert_eq!(day_number(ymd(1969, 12, 31)), -1.0);
    }

    #[test]
    fn test_date_from_day_number_inverts() {
        let d = ymd(2003, 6, 15);
        assert_eq!(date_from_day_number(day_number(d)), Some(d));
        assert_eq!(date_from_day_number(day_number(d) + 0.75), Some(d));
    }

    #[test]
    fn test_from_kelvin_subtracts_offset() {
        let r = NormalizedRecord::from_kelvin(ymd(2020, 1, 1), 300.0);
        assert_eq!(r.sst_celsius, 300.0 - 273.15);
    }

    #[test]
    fn test_series_helpers() {
        let series = SstSeries::new(vec![
            NormalizedRecord::from_kelvin(ymd(2019, 12, 31), 290.0),
            NormalizedRecord::from_kelvin(ymd(2020, 1, 1), 280.0),
            NormalizedRecord::from_kelvin(ymd(2020, 1, 2), 285.0),
        ]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.years().into_iter().collect::<Vec<_>>(), vec![2019, 2020]);
        let (lo, hi) = series.celsius_range().unwrap();
        assert_eq!(lo, 280.0 - KELVIN_OFFSET);
        assert_eq!(hi, 290.0 - KELVIN_OFFSET);
        assert_eq!(series.date_span(), Some((ymd(2019, 12, 31), ymd(2020, 1, 2))));
        assert!(SstSeries::default().celsius_range().is_none());
    }
}
