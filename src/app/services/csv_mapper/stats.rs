//! Mapping result and statistics

use crate::app::models::SeriesObservation;
use std::collections::HashMap;

/// Observation sequences keyed by parameter name
pub type SeriesObservations = HashMap<String, Vec<SeriesObservation>>;

/// Mapping result with observations and basic statistics
#[derive(Debug, Clone)]
pub struct MappingResult {
    /// Parameters in request order, duplicates removed
    pub parameters: Vec<String>,

    /// One sequence per parameter, one observation per data row
    pub observations: SeriesObservations,

    pub stats: MappingStats,
}

impl MappingResult {
    /// Observations for a parameter, empty if it was not requested
    pub fn observations_for(&self, parameter: &str) -> &[SeriesObservation] {
        self.observations
            .get(parameter)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Simple mapping statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MappingStats {
    /// Number of data rows read after the header
    pub rows_mapped: usize,

    /// Number of requested parameters
    pub parameters_mapped: usize,

    /// Total observations created across all parameters
    pub observations_created: usize,
}

impl MappingStats {
    pub fn new(rows_mapped: usize, parameters_mapped: usize) -> Self {
        Self {
            rows_mapped,
            parameters_mapped,
            observations_created: rows_mapped * parameters_mapped,
        }
    }
}
