//! Column resolution for uploaded CSV files
//!
//! Column names are matched exactly and case-sensitively; when a header
//! repeats a name, the first occurrence wins.

use crate::constants::{DEPTH_COLUMN, LAT_COLUMN, LON_COLUMN, TIMESTAMP_COLUMN};
use crate::{Error, Result};
use csv::StringRecord;

/// Locate `name` in a header row, returning its zero-based position
pub fn resolve<'a, I>(header: I, name: &str) -> Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    header
        .into_iter()
        .position(|column| column == name)
        .ok_or_else(|| Error::missing_column(name))
}

/// Resolved column indices for one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub timestamp: usize,
    pub lat: usize,
    pub lon: usize,
    pub depth: usize,

    /// Requested parameters with their column index, in request order
    pub parameters: Vec<(String, usize)>,
}

impl ColumnMapping {
    /// Resolve the positional columns and every requested parameter
    ///
    /// Fails on the first absent column; positional columns are checked
    /// before parameters.
    pub fn resolve(header: &StringRecord, parameters: &[String]) -> Result<Self> {
        let timestamp = resolve(header, TIMESTAMP_COLUMN)?;
        let lat = resolve(header, LAT_COLUMN)?;
        let lon = resolve(header, LON_COLUMN)?;
        let depth = resolve(header, DEPTH_COLUMN)?;

        let parameters = parameters
            .iter()
            .map(|name| resolve(header, name).map(|index| (name.clone(), index)))
            .collect::<Result<Vec<_>>>()?;

        Ok(ColumnMapping {
            timestamp,
            lat,
            lon,
            depth,
            parameters,
        })
    }

    /// Get the index for a requested parameter
    pub fn parameter_index(&self, parameter: &str) -> Option<usize> {
        self.parameters
            .iter()
            .find(|(name, _)| name == parameter)
            .map(|(_, index)| *index)
    }

    /// Number of requested parameters
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}
