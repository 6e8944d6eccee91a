//! CSV to time series mapper for glider uploads
//!
//! This module turns an uploaded CSV file into per-parameter observation
//! sequences. Mapping is all-or-nothing: any missing column, malformed
//! timestamp or malformed record rejects the whole file.
//!
//! ## Architecture
//!
//! The mapper is organized into logical components:
//! - [`column_mapping`] - Resolution of required columns against the header row
//! - [`field_parsers`] - Timestamp parsing and rendering, cell access
//! - [`record_mapper`] - Fan-out of a single data row to every requested parameter
//! - [`mapper`] - Orchestration over the whole file
//! - [`stats`] - Mapping result and statistics
//!
//! ## Usage
//!
//! ```rust
//! use boatload::app::services::csv_mapper::CsvObservationMapper;
//! use boatload::config::OutputTimeZone;
//!
//! # fn example() -> boatload::Result<()> {
//! let csv = "timestamp,lat,lon,depth,temperature\n1631968840,58.144699,7.998280,33.33,69.69\n";
//! let mapper = CsvObservationMapper::new(OutputTimeZone::utc());
//! let result = mapper.map_str(&["temperature".to_string()], csv)?;
//!
//! assert_eq!(result.observations["temperature"][0].body.value, "69.69");
//! # Ok(())
//! # }
//! ```

pub mod column_mapping;
pub mod field_parsers;
pub mod mapper;
pub mod record_mapper;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::{ColumnMapping, resolve};
pub use mapper::CsvObservationMapper;
pub use stats::{MappingResult, MappingStats, SeriesObservations};
