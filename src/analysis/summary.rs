use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use serde::Serialize;

use super::descriptive::Descriptive;
use super::mann_kendall::MannKendall;
use super::regression::LinearFit;
use crate::error::Result;

/// All scalar outputs of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub descriptive: Descriptive,
    pub regression: LinearFit,
    pub mann_kendall: MannKendall,
}

impl Summary {
    /// Human-readable console lines; temperatures to two decimals.
    pub fn lines(&self) -> Vec<String> {
        let d = &self.descriptive;
        vec![
            format!("Number of years: {}", d.year_count),
            format!("Mean SST: {:.2} °C", d.mean_celsius),
            format!(
                "Trend: {} (p-value: {:.4})",
                self.mann_kendall.trend, self.mann_kendall.p_value
            ),
            format!(
                "Linear trend: {:.6} °C/day, intercept {:.2}",
                self.regression.slope, self.regression.intercept
            ),
            format!("Maximum SST: {:.2} °C on {}", d.max.celsius, d.max.date),
            format!("Minimum SST: {:.2} °C on {}", d.min.celsius, d.min.date),
        ]
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self).map_err(std::io::Error::from)?;
        info!("Wrote summary report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{descriptive, mann_kendall, regression};
    use crate::data::model::{NormalizedRecord, SstSeries};
    use chrono::NaiveDate;

    fn summary() -> Summary {
        let series = SstSeries::new(
            [283.15, 288.15, 293.15]
                .iter()
                .enumerate()
                .map(|(i, &k)| {
                    NormalizedRecord::from_kelvin(
                        NaiveDate::from_ymd_opt(2020, 1, 1 + i as u32).unwrap(),
                        k,
                    )
                })
                .collect(),
        );
        Summary {
            descriptive: descriptive::Descriptive::compute(&series).unwrap(),
            regression: regression::fit_series(&series).unwrap(),
            mann_kendall: mann_kendall::original_test(&series.celsius(), mann_kendall::DEFAULT_ALPHA)
                .unwrap(),
        }
    }

    #[test]
    fn test_console_lines() {
        let lines = summary().lines();
        assert_eq!(lines[0], "Number of years: 1");
        assert_eq!(lines[1], "Mean SST: 15.00 °C");
        assert_eq!(lines[2], "Trend: no trend (p-value: 0.2963)");
        assert_eq!(lines[4], "Maximum SST: 20.00 °C on 2020-01-03");
        assert_eq!(lines[5], "Minimum SST: 10.00 °C on 2020-01-01");
    }

    #[test]
    fn test_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        summary().write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["descriptive"]["year_count"], 1);
        assert_eq!(value["descriptive"]["max"]["date"], "2020-01-03");
        assert_eq!(value["mann_kendall"]["trend"], "no trend");
    }
}
