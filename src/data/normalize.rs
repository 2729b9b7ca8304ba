use chrono::NaiveDateTime;
use log::debug;

use super::model::{NormalizedRecord, Observation, SstSeries};
use crate::error::{Result, SstError};

/// Exact timestamp layout of the export: microseconds and a literal `Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Number of fractional-second digits the export always carries.
const FRACTION_DIGITS: usize = 6;

/// Parse one export timestamp into a naive UTC date-time.
///
/// chrono treats the fraction as optional and accepts any digit count, so
/// the exact width is checked before parsing.
pub fn parse_timestamp(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    let fraction = raw
        .strip_suffix('Z')
        .and_then(|rest| rest.rsplit_once('.'))
        .map(|(_, digits)| digits)
        .ok_or_else(|| "missing '.ffffffZ' suffix".to_string())?;
    if fraction.len() != FRACTION_DIGITS || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("expected {FRACTION_DIGITS} fractional digits, got '{fraction}'"));
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| e.to_string())
}

/// Turn raw observations into the daily normalized series.
///
/// Every timestamp must match [`TIMESTAMP_FORMAT`]; the time of day is
/// discarded and Celsius is derived as `kelvin - 273.15`. `row` in errors is
/// the 1-based data row.
pub fn normalize(observations: &[Observation]) -> Result<SstSeries> {
    let records = observations
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let timestamp = parse_timestamp(&obs.timestamp).map_err(|e| SstError::Parse {
                row: i + 1,
                message: format!("timestamp '{}' does not match {TIMESTAMP_FORMAT}: {e}", obs.timestamp),
            })?;
            Ok(NormalizedRecord::from_kelvin(timestamp.date(), obs.sst_kelvin))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("normalized {} records", records.len());
    Ok(SstSeries::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::KELVIN_OFFSET;
    use chrono::NaiveDate;

    fn obs(ts: &str, k: f64) -> Observation {
        Observation {
            timestamp: ts.to_string(),
            sst_kelvin: k,
        }
    }

    #[test]
    fn test_truncates_to_date() {
        let series = normalize(&[obs("2020-02-29T23:59:59.999999Z", 290.0)]).unwrap();
        assert_eq!(
            series.records[0].date,
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_celsius_is_exact_difference() {
        let kelvins = [271.35, 283.15, 299.999, 305.0];
        let input: Vec<_> = kelvins
            .iter()
            .enumerate()
            .map(|(i, &k)| obs(&format!("2020-01-0{}T00:00:00.000000Z", i + 1), k))
            .collect();
        let series = normalize(&input).unwrap();
        for (rec, &k) in series.records.iter().zip(kelvins.iter()) {
            assert_eq!(rec.sst_kelvin, k);
            assert_eq!(rec.sst_celsius, k - KELVIN_OFFSET);
        }
    }

    #[test]
    fn test_preserves_order() {
        let series = normalize(&[
            obs("2020-01-03T00:00:00.000000Z", 1.0),
            obs("2020-01-01T00:00:00.000000Z", 2.0),
        ])
        .unwrap();
        assert_eq!(series.records[0].sst_kelvin, 1.0);
        assert_eq!(series.records[1].sst_kelvin, 2.0);
    }

    #[test]
    fn test_rejects_deviating_timestamps() {
        for bad in [
            "2020-01-01T00:00:00Z",
            "2020-01-01T00:00:00.000000",
            "2020-01-01 00:00:00.000000Z",
            "2020-13-01T00:00:00.000000Z",
            "01/01/2020",
        ] {
            let err = normalize(&[obs("2020-01-01T00:00:00.000000Z", 1.0), obs(bad, 1.0)])
                .unwrap_err();
            assert!(
                matches!(err, SstError::Parse { row: 2, .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_timestamp_keeps_microseconds() {
        let ts = parse_timestamp("2019-07-04T09:30:15.123456Z").unwrap();
        assert_eq!(ts.to_string(), "2019-07-04 09:30:15.123456");
        assert!(parse_timestamp("2019-07-04T09:30:15.123Z").is_err());
    }

    #[test]
    fn test_empty_input_gives_empty_series() {
        assert!(normalize(&[]).unwrap().is_empty());
    }
}
