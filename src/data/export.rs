use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::info;

use super::model::{NormalizedRecord, SstSeries};
use crate::error::{Result, SstError};

/// Default artifact name, written to the working directory.
pub const DEFAULT_OUTPUT: &str = "sst_daily_celsius.csv";

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Write the normalized series as CSV (`Dates,SST_Kelvin,SST_Celsius`, no
/// index column). The file is created or truncated.
pub fn write_normalized(series: &SstSeries, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_records(series, file)?;
    info!("Wrote {} records to {}", series.len(), path.display());
    Ok(())
}

/// Serialize the series to any writer.
pub fn write_records<W: Write>(series: &SstSeries, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in &series.records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reader (round-trip of the artifact above)
// ---------------------------------------------------------------------------

/// Reload a CSV produced by [`write_normalized`].
pub fn read_normalized(path: &Path) -> Result<SstSeries> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SstError::FileNotFound(path.to_path_buf()),
        _ => SstError::Io(e),
    })?;
    read_records(file)
}

/// Deserialize normalized records from any reader.
pub fn read_records<R: Read>(reader: R) -> Result<SstSeries> {
    let mut reader = csv::Reader::from_reader(reader);
    let records = reader
        .deserialize::<NormalizedRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(SstSeries::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> SstSeries {
        SstSeries::new(vec![
            NormalizedRecord::from_kelvin(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 283.15),
            NormalizedRecord::from_kelvin(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(), 291.337),
        ])
    }

    #[test]
    fn test_header_and_no_index() {
        let mut buf = Vec::new();
        write_records(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Dates,SST_Kelvin,SST_Celsius"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("2020-01-01,283.15,"));
        assert_eq!(first.split(',').count(), 3);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT);
        let series = sample();

        write_normalized(&series, &path).unwrap();
        let reloaded = read_normalized(&path).unwrap();

        assert_eq!(reloaded.len(), series.len());
        for (a, b) in reloaded.records.iter().zip(series.records.iter()) {
            assert_eq!(a.date, b.date);
            approx::assert_relative_eq!(a.sst_celsius, b.sst_celsius, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale content that is longer than the new file\n".repeat(50)).unwrap();

        write_normalized(&sample(), &path).unwrap();
        assert_eq!(read_normalized(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_unwritable_path_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");
        assert!(matches!(write_normalized(&sample(), &path), Err(SstError::Io(_))));
    }
}
