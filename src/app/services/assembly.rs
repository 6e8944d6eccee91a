//! Time series assembly
//!
//! Wraps each parameter's observation sequence with the identity and
//! provenance supplied by the caller. Identity is never defaulted: a request
//! without a glider id or series type is rejected.

use tracing::debug;

use crate::app::models::{HeaderExtra, HeaderId, SeriesEntry, SeriesHeader, TimeSeries};
use crate::app::services::csv_mapper::{MappingResult, SeriesObservations};
use crate::{Error, Result};

/// Identity and provenance shared by every series of one upload
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeriesIdentity {
    /// Category label of the time series
    pub tstype: String,

    /// Research vessel identifier
    pub glider_id: String,

    /// Name of the association contributing data
    #[serde(default)]
    pub source: String,

    /// Name of the vessel
    #[serde(default)]
    pub name: String,
}

impl SeriesIdentity {
    /// Create a new identity with validation
    pub fn new(
        tstype: impl Into<String>,
        glider_id: impl Into<String>,
        source: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let identity = Self {
            tstype: tstype.into(),
            glider_id: glider_id.into(),
            source: source.into(),
            name: name.into(),
        };

        identity.validate()?;
        Ok(identity)
    }

    /// Validate that the identifying fields are present
    pub fn validate(&self) -> Result<()> {
        if self.tstype.trim().is_empty() {
            return Err(Error::invalid_request("Time series type (tstype) is required"));
        }

        if self.glider_id.trim().is_empty() {
            return Err(Error::invalid_request("Glider id (glider_id) is required"));
        }

        Ok(())
    }

    fn header_for(&self, parameter: &str) -> SeriesHeader {
        SeriesHeader {
            id: HeaderId {
                glider_id: self.glider_id.clone(),
                parameter: parameter.to_string(),
            },
            extra: HeaderExtra {
                source: self.source.clone(),
                name: self.name.clone(),
            },
        }
    }
}

/// Assemble a time series with one entry per parameter, in parameter order
///
/// A parameter without observations yields a header-only entry.
pub fn assemble(
    identity: &SeriesIdentity,
    parameters: &[String],
    mut observations: SeriesObservations,
) -> Result<TimeSeries> {
    identity.validate()?;

    let entries = parameters
        .iter()
        .map(|parameter| SeriesEntry {
            header: identity.header_for(parameter),
            observations: observations.remove(parameter).unwrap_or_default(),
        })
        .collect();

    let time_series = TimeSeries::new(identity.tstype.clone(), entries);
    time_series.validate()?;

    debug!(
        "Assembled time series '{}' for {} with {} entries and {} observations",
        time_series.ts_type,
        identity.glider_id,
        time_series.entries.len(),
        time_series.observation_count()
    );

    Ok(time_series)
}

/// Assemble a time series from a complete mapping result
pub fn assemble_mapping(identity: &SeriesIdentity, mapping: MappingResult) -> Result<TimeSeries> {
    assemble(identity, &mapping.parameters, mapping.observations)
}
