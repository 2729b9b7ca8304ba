use std::fmt;

use chrono::NaiveDate;
use log::warn;

use super::model::SstSeries;
use crate::error::{Result, SstError};

// ---------------------------------------------------------------------------
// Daily cadence findings
// ---------------------------------------------------------------------------

/// A deviation from "exactly one record per consecutive day".
///
/// Sub-daily sampling shows up as [`CadenceIssue::Duplicate`] because the
/// time of day is dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CadenceIssue {
    Gap {
        after: NaiveDate,
        next: NaiveDate,
        missing_days: i64,
    },
    Duplicate(NaiveDate),
    OutOfOrder {
        previous: NaiveDate,
        date: NaiveDate,
    },
}

impl fmt::Display for CadenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CadenceIssue::Gap {
                after,
                next,
                missing_days,
            } => write!(f, "{missing_days} missing day(s) between {after} and {next}"),
            CadenceIssue::Duplicate(d) => write!(f, "more than one record on {d}"),
            CadenceIssue::OutOfOrder { previous, date } => {
                write!(f, "{date} follows {previous}")
            }
        }
    }
}

/// Scan consecutive records for gaps, duplicate days and reversals.
pub fn check_cadence(series: &SstSeries) -> Vec<CadenceIssue> {
    series
        .records
        .windows(2)
        .filter_map(|pair| {
            let (previous, date) = (pair[0].date, pair[1].date);
            let step = (date - previous).num_days();
            match step {
                1 => None,
                0 => Some(CadenceIssue::Duplicate(date)),
                s if s < 0 => Some(CadenceIssue::OutOfOrder { previous, date }),
                s => Some(CadenceIssue::Gap {
                    after: previous,
                    next: date,
                    missing_days: s - 1,
                }),
            }
        })
        .collect()
}

/// Log every finding; in strict mode any finding becomes an error.
pub fn enforce_cadence(series: &SstSeries, strict: bool) -> Result<Vec<CadenceIssue>> {
    let issues = check_cadence(series);
    for issue in &issues {
        warn!("cadence: {issue}");
    }
    if strict {
        if let Some(first) = issues.first() {
            return Err(SstError::Cadence(format!(
                "{first} ({} issue(s) in total)",
                issues.len()
            )));
        }
    }
    Ok(issues)
}
