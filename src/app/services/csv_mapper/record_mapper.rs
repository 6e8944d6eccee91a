//! Individual CSV record mapping
//!
//! Every data row carries one shared spatiotemporal context (time and
//! position) which is fanned out to each requested parameter.

use csv::StringRecord;

use super::column_mapping::ColumnMapping;
use super::field_parsers::{get_field, parse_timestamp_field};
use super::stats::SeriesObservations;
use crate::Result;
use crate::app::models::{ObservationBody, ObservationPosition, SeriesObservation};
use crate::config::OutputTimeZone;
use crate::constants::quality_flags;

/// Build the position of a data row, copying coordinates verbatim
pub fn parse_position(
    record: &StringRecord,
    mapping: &ColumnMapping,
    row: usize,
) -> Result<ObservationPosition> {
    Ok(ObservationPosition {
        lon: get_field(record, mapping.lon, row)?.to_string(),
        lat: get_field(record, mapping.lat, row)?.to_string(),
        depth: get_field(record, mapping.depth, row)?.to_string(),
        qc_flag: quality_flags::UNCERTAIN.to_string(),
    })
}

/// Map one data row into a single observation per requested parameter
///
/// Observations are only appended once the whole row has been read, so a
/// failing row never leaves some parameters one observation ahead.
pub fn map_observation_record(
    record: &StringRecord,
    mapping: &ColumnMapping,
    time_zone: OutputTimeZone,
    row: usize,
    observations: &mut SeriesObservations,
) -> Result<()> {
    let time = parse_timestamp_field(record, mapping.timestamp, time_zone, row)?;
    let pos = parse_position(record, mapping, row)?;

    let values = mapping
        .parameters
        .iter()
        .map(|(parameter, index)| get_field(record, *index, row).map(|value| (parameter, value)))
        .collect::<Result<Vec<_>>>()?;

    for (parameter, value) in values {
        observations
            .entry(parameter.clone())
            .or_default()
            .push(SeriesObservation {
                time: time.clone(),
                body: ObservationBody {
                    pos: pos.clone(),
                    value: value.to_string(),
                    qc_flag: quality_flags::UNCERTAIN.to_string(),
                },
            });
    }

    Ok(())
}
