//! Delimited-text export of observability records.

use chrono::FixedOffset;

use crate::api::ObservabilityRecord;
use crate::error::{DsoError, Result};
use crate::services::astronomical_night::zone_label;

pub const DELIMITER: u8 = b';';

pub const HEADER: [&str; 12] = [
    "Name",
    "Type",
    "Constellation",
    "Magnitude",
    "RA",
    "Dec",
    "Max Altitude (°)",
    "Azimuth at Max (°)",
    "Direction at Max",
    "Max Continuous Duration (h)",
    "Peak Time (UTC)",
    "Peak Time (Local)",
];

/// One export row, local peak time labelled with the zone of `offset`.
pub fn record_row(record: &ObservabilityRecord, offset: FixedOffset) -> Vec<String> {
    let peak = record.peak_time_utc();
    vec![
        record.name.clone(),
        record.object_type.clone(),
        record.constellation.clone(),
        format!("{:.1}", record.magnitude),
        record.ra_formatted.clone(),
        record.dec_formatted.clone(),
        format!("{:.1}", record.peak_altitude),
        format!("{:.1}", record.peak_azimuth),
        record.peak_direction.to_string(),
        format!("{:.1}", record.max_continuous_hours),
        peak.format("%Y-%m-%d %H:%M").to_string(),
        format!(
            "{} ({})",
            peak.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
            zone_label(offset)
        ),
    ]
}

fn export_error(e: impl std::fmt::Display) -> DsoError {
    DsoError::Export(e.to_string())
}

/// Header plus one line per record, newline terminated.
pub fn to_delimited(records: &[ObservabilityRecord], offset: FixedOffset) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(HEADER).map_err(export_error)?;
    for record in records {
        wtr.write_record(record_row(record, offset))
            .map_err(export_error)?;
    }

    let bytes = wtr.into_inner().map_err(export_error)?;
    String::from_utf8(bytes).map_err(export_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CardinalDirection;
    use crate::ephemeris::EquatorialCoordinates;
    use crate::models::ModifiedJulianDate;
    use chrono::{TimeZone, Utc};

    fn sample() -> ObservabilityRecord {
        ObservabilityRecord {
            name: "M31 Andromeda Galaxy".to_string(),
            object_type: "Galaxy".to_string(),
            constellation: "Andromeda".to_string(),
            magnitude: 3.4,
            ra: "00h42m44.3s".to_string(),
            dec: "+41d16m09s".to_string(),
            ra_formatted: "00h 42m 44.3s".to_string(),
            dec_formatted: "+41° 16' 09\"".to_string(),
            coordinates: EquatorialCoordinates::new(10.68, 41.27),
            peak_altitude: 84.123,
            peak_azimuth: 179.96,
            peak_direction: CardinalDirection::S,
            peak_time: ModifiedJulianDate::from_datetime(
                Utc.with_ymd_and_hms(2024, 10, 1, 23, 30, 0).unwrap(),
            ),
            altitudes: vec![],
            azimuths: vec![],
            min_altitude: 20.0,
            max_continuous_hours: 7.5,
        }
    }

    #[test]
    fn test_header_and_row() {
        let offset = FixedOffset::east_opt(7200).unwrap();
        let text = to_delimited(&[sample()], offset).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Name;Type;Constellation;Magnitude;RA;Dec;"));
        assert_eq!(
            lines[1],
            "M31 Andromeda Galaxy;Galaxy;Andromeda;3.4;00h 42m 44.3s;\"+41° 16' 09\"\"\";84.1;180.0;S;7.5;\
             2024-10-01 23:30;2024-10-02 01:30 (UTC+02:00)"
        );
    }

    #[test]
    fn test_delimiter_and_quotes_are_quoted() {
        let mut record = sample();
        record.name = "Cat;Dog \"Nebula\"".to_string();
        let text = to_delimited(&[record], FixedOffset::east_opt(0).unwrap()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Cat;Dog \"\"Nebula\"\"\";Galaxy;"));
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let text = to_delimited(&[], FixedOffset::east_opt(0).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.split(';').count(), HEADER.len());
    }
}
