use std::ops::Range;

use chrono::{Datelike, NaiveDate};
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;

use crate::data::model::{date_from_day_number, day_number, SstSeries};

/// Fraction of the data span added on each side of an automatic range.
pub const AUTO_MARGIN: f64 = 0.05;

/// How the y axis of a figure is bounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YRange {
    /// Data range plus [`AUTO_MARGIN`] padding.
    Auto,
    /// Tight data range, no padding.
    Data,
    Fixed(f64, f64),
}

impl YRange {
    pub fn resolve(self, series: &SstSeries) -> Range<f64> {
        match self {
            YRange::Fixed(lo, hi) => lo..hi,
            YRange::Data => match series.celsius_range() {
                Some((lo, hi)) => widen_if_flat(lo, hi),
                None => 0.0..1.0,
            },
            YRange::Auto => match series.celsius_range() {
                Some((lo, hi)) => padded(lo, hi),
                None => 0.0..1.0,
            },
        }
    }
}

fn widen_if_flat(lo: f64, hi: f64) -> Range<f64> {
    if hi > lo {
        lo..hi
    } else {
        (lo - 0.5)..(hi + 0.5)
    }
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    if span > 0.0 {
        (lo - span * AUTO_MARGIN)..(hi + span * AUTO_MARGIN)
    } else {
        (lo - 0.5)..(hi + 0.5)
    }
}

/// Day-number x range covering the series, with automatic padding.
pub fn day_range(series: &SstSeries) -> Range<f64> {
    match series.date_span() {
        Some((first, last)) => padded(day_number(first), day_number(last)),
        None => 0.0..1.0,
    }
}

/// Tick positions at 1 January of every year inside `range`.
pub fn year_ticks(range: &Range<f64>) -> Vec<f64> {
    let (Some(start), Some(end)) = (
        date_from_day_number(range.start),
        date_from_day_number(range.end),
    ) else {
        return Vec::new();
    };
    (start.year()..=end.year() + 1)
        .filter_map(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        .map(day_number)
        .filter(|d| range.contains(d))
        .collect()
}

/// Year-only tick label for a day number.
pub fn year_label(day: f64) -> String {
    date_from_day_number(day)
        .map(|d| d.year().to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// TickAxis – linear axis with caller-chosen tick positions
// ---------------------------------------------------------------------------

/// A linear `f64` axis whose key points are a fixed list, such as the
/// 1 January positions of [`year_ticks`] or the integer years of the boxplot.
#[derive(Debug, Clone)]
pub struct TickAxis {
    range: Range<f64>,
    ticks: Vec<f64>,
}

impl TickAxis {
    pub fn new(range: Range<f64>, ticks: Vec<f64>) -> Self {
        TickAxis { range, ticks }
    }

    /// At most `max` ticks, evenly thinned when there are more.
    pub fn ticks(&self, max: usize) -> Vec<f64> {
        if max == 0 {
            return Vec::new();
        }
        let step = self.ticks.len().div_ceil(max).max(1);
        self.ticks.iter().copied().step_by(step).collect()
    }
}

impl Ranged for TickAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        RangedCoordf64::from(self.range.clone()).map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.ticks(hint.max_num_points())
    }

    fn range(&self) -> Range<f64> {
        self.range.clone()
    }
}
