//! Core CSV mapper implementation
//!
//! This module drives the mapping of a whole upload: header resolution,
//! record iteration and coordination with the record mapper.

use std::io::Read;
use tracing::debug;

use super::column_mapping::ColumnMapping;
use super::record_mapper::map_observation_record;
use super::stats::{MappingResult, MappingStats, SeriesObservations};
use crate::config::OutputTimeZone;
use crate::{Error, Result};

/// Mapper from uploaded CSV files to per-parameter observation sequences
///
/// The mapper holds no state besides its output time zone and can be shared
/// freely between concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvObservationMapper {
    time_zone: OutputTimeZone,
}

impl CsvObservationMapper {
    /// Create a mapper rendering timestamps in `time_zone`
    pub fn new(time_zone: OutputTimeZone) -> Self {
        Self { time_zone }
    }

    pub fn time_zone(&self) -> OutputTimeZone {
        self.time_zone
    }

    /// Map CSV content held in memory
    pub fn map_str(&self, parameters: &[String], content: &str) -> Result<MappingResult> {
        self.map(parameters, content.as_bytes())
    }

    /// Map a CSV stream
    ///
    /// Every requested parameter gets exactly one observation per data row,
    /// in file order. Any error discards everything mapped so far.
    pub fn map<R: Read>(&self, parameters: &[String], reader: R) -> Result<MappingResult> {
        let parameters = normalize_parameters(parameters)?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| Error::csv_parsing(format!("Failed to read CSV header: {e}"), Some(e)))?
            .clone();

        if headers.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mapping = ColumnMapping::resolve(&headers, &parameters)?;
        debug!(
            "Column mapping: timestamp={}, lat={}, lon={}, depth={}, {} parameters",
            mapping.timestamp,
            mapping.lat,
            mapping.lon,
            mapping.depth,
            mapping.parameter_count()
        );

        let mut observations: SeriesObservations = parameters
            .iter()
            .map(|p| (p.clone(), Vec::new()))
            .collect();

        let mut rows = 0;
        for (row, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| {
                Error::csv_parsing(format!("Failed to read data row {row}: {e}"), Some(e))
            })?;

            map_observation_record(&record, &mapping, self.time_zone, row, &mut observations)?;
            rows += 1;
        }

        let stats = MappingStats::new(rows, parameters.len());
        debug!(
            "Mapped {} rows into {} observations across {} parameters",
            stats.rows_mapped, stats.observations_created, stats.parameters_mapped
        );

        Ok(MappingResult {
            parameters,
            observations,
            stats,
        })
    }
}

/// Validate requested parameters and drop repeated names, keeping the first
pub fn normalize_parameters(parameters: &[String]) -> Result<Vec<String>> {
    if parameters.is_empty() {
        return Err(Error::invalid_request(
            "At least one parameter must be requested",
        ));
    }

    let mut normalized: Vec<String> = Vec::with_capacity(parameters.len());
    for parameter in parameters {
        if parameter.trim().is_empty() {
            return Err(Error::invalid_request("Parameter names cannot be empty"));
        }
        if !normalized.contains(parameter) {
            normalized.push(parameter.clone());
        }
    }

    Ok(normalized)
}
