//! Field parsing utilities for uploaded CSV records

use crate::config::OutputTimeZone;
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat};
use csv::StringRecord;

/// Get a cell from a CSV record by column index
pub fn get_field(record: &StringRecord, index: usize, row: usize) -> Result<&str> {
    record.get(index).ok_or_else(|| {
        Error::csv_parsing(
            format!("Data row {row} has no value for column {index}"),
            None,
        )
    })
}

/// Parse an integer count of seconds since the epoch
///
/// Surrounding whitespace is ignored; anything else that is not an integer
/// is a malformed timestamp.
pub fn parse_epoch_seconds(value: &str, row: usize) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::malformed_timestamp(row, value))
}

/// Render epoch seconds as an RFC3339 timestamp in the given time zone
///
/// UTC renders with a `Z` suffix, other zones with a `+HH:MM` offset.
/// Instants whose local time falls outside chrono's range are malformed.
pub fn format_timestamp(seconds: i64, time_zone: OutputTimeZone, row: usize) -> Result<String> {
    let out_of_range = || Error::malformed_timestamp(row, seconds.to_string());

    let instant = DateTime::from_timestamp(seconds, 0).ok_or_else(out_of_range)?;
    let offset = time_zone.offset();
    instant
        .naive_utc()
        .checked_add_offset(offset)
        .ok_or_else(out_of_range)?;

    Ok(instant
        .with_timezone(&offset)
        .to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Parse and render the timestamp cell of a data row
pub fn parse_timestamp_field(
    record: &StringRecord,
    index: usize,
    time_zone: OutputTimeZone,
    row: usize,
) -> Result<String> {
    let value = get_field(record, index, row)?;
    let seconds = parse_epoch_seconds(value, row)?;
    format_timestamp(seconds, time_zone, row)
}
