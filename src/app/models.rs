//! Data models for boatload
//!
//! This module contains the time series structures exchanged with the
//! collection service. Measured values, coordinates and timestamps are kept as
//! text: their numeric meaning is the collection service's concern.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Time Series Structure
// =============================================================================

/// A labeled collection of series entries
///
/// Entry order carries no meaning for the collection service but is preserved
/// so that identical uploads serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Category label of the time series
    #[serde(rename = "tstype")]
    pub ts_type: String,

    /// One entry per measured parameter
    #[serde(rename = "tseries")]
    pub entries: Vec<SeriesEntry>,
}

impl TimeSeries {
    /// Create a new time series
    pub fn new(ts_type: impl Into<String>, entries: Vec<SeriesEntry>) -> Self {
        Self {
            ts_type: ts_type.into(),
            entries,
        }
    }

    /// Copy of this time series with every entry's observations cleared
    ///
    /// Used when only series identity, not data, needs to cross a boundary.
    pub fn headers_only(&self) -> Self {
        Self {
            ts_type: self.ts_type.clone(),
            entries: self
                .entries
                .iter()
                .map(|entry| SeriesEntry {
                    header: entry.header.clone(),
                    observations: Vec::new(),
                })
                .collect(),
        }
    }

    /// Total number of observations across all entries
    pub fn observation_count(&self) -> usize {
        self.entries.iter().map(|e| e.observations.len()).sum()
    }

    /// Validate that every series carries a unique, non-empty identity
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for entry in &self.entries {
            entry.header.id.validate()?;

            if !seen.insert(&entry.header.id) {
                return Err(Error::data_validation(format!(
                    "Duplicate series id: gliderID '{}', parameter '{}'",
                    entry.header.id.glider_id, entry.header.id.parameter
                )));
            }
        }

        Ok(())
    }
}

/// One measured parameter's identity plus its observation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub header: SeriesHeader,

    /// Observations in arrival order (empty for header-only series)
    #[serde(default)]
    pub observations: Vec<SeriesObservation>,
}

/// Identity and provenance of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesHeader {
    pub id: HeaderId,
    pub extra: HeaderExtra,
}

/// Logical key of a series within a time series
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderId {
    /// Research vessel identifier (e.g. association initials + _ + vessel name)
    #[serde(rename = "gliderID")]
    pub glider_id: String,

    /// What has been measured (e.g. "temperature")
    pub parameter: String,
}

impl HeaderId {
    /// Validate that both parts of the key are non-empty
    pub fn validate(&self) -> Result<()> {
        if self.glider_id.trim().is_empty() {
            return Err(Error::data_validation("Series gliderID cannot be empty"));
        }

        if self.parameter.trim().is_empty() {
            return Err(Error::data_validation(format!(
                "Series parameter cannot be empty (gliderID '{}')",
                self.glider_id
            )));
        }

        Ok(())
    }
}

/// Human-facing provenance, descriptive only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderExtra {
    /// Name of the association contributing data
    pub source: String,

    /// Name of the vessel
    pub name: String,
}

// =============================================================================
// Observation Structures
// =============================================================================

/// A single reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesObservation {
    /// RFC3339 timestamp
    pub time: String,
    pub body: ObservationBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationBody {
    pub pos: ObservationPosition,

    /// The measured value, verbatim from the upload
    pub value: String,

    /// Quality flag of the value
    pub qc_flag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationPosition {
    pub lon: String,
    pub lat: String,

    /// Depth of measurement expressed in meters
    pub depth: String,

    /// Quality flag of the position as a whole
    pub qc_flag: String,
}
