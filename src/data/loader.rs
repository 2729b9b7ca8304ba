use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, info};

use super::model::Observation;
use crate::error::{Result, SstError};

/// Header of the timestamp column in the satellite export.
pub const TIME_COLUMN: &str = "time";
/// Header of the Kelvin SST column in the satellite export.
pub const SST_COLUMN: &str = "analysed_sst";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the raw observations from a delimited export.
///
/// The delimiter follows the extension: `.tsv` / `.tab` are tab separated,
/// everything else is comma separated. Lines starting with `comment` are
/// skipped, the first remaining line is the header.
pub fn load_file(path: &Path, comment: u8) -> Result<Vec<Observation>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SstError::FileNotFound(path.to_path_buf()),
        _ => SstError::Io(e),
    })?;

    let delimiter = match extension(path).as_str() {
        "tsv" | "tab" => b'\t',
        _ => b',',
    };
    debug!(
        "reading {} (delimiter {:?}, comment {:?})",
        path.display(),
        delimiter as char,
        comment as char
    );

    let observations = read_observations(file, delimiter, comment)?;
    info!(
        "Loaded {} observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Delimited reader
// ---------------------------------------------------------------------------

/// Parse observations from any reader. Columns other than `time` and
/// `analysed_sst` are ignored; row order is preserved.
pub fn read_observations<R: Read>(reader: R, delimiter: u8, comment: u8) -> Result<Vec<Observation>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .comment(Some(comment))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SstError::ColumnNotFound(name.to_string()))
    };
    let time_idx = column(TIME_COLUMN)?;
    let sst_idx = column(SST_COLUMN)?;

    let mut observations = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row_no + 1);

        let timestamp = record.get(time_idx).ok_or_else(|| SstError::Parse {
            row,
            message: format!("missing '{TIME_COLUMN}' field"),
        })?;
        let raw_sst = record.get(sst_idx).ok_or_else(|| SstError::Parse {
            row,
            message: format!("missing '{SST_COLUMN}' field"),
        })?;
        let sst_kelvin = raw_sst.parse::<f64>().map_err(|e| SstError::Parse {
            row,
            message: format!("'{raw_sst}' is not a number: {e}"),
        })?;
        if !sst_kelvin.is_finite() {
            return Err(SstError::Parse {
                row,
                message: format!("'{raw_sst}' is not a finite temperature"),
            });
        }

        observations.push(Observation {
            timestamp: timestamp.to_string(),
            sst_kelvin,
        });
    }

    Ok(observations)
}
