//! Boatload Library
//!
//! A Rust library for ingesting oceanographic glider readings submitted as CSV
//! files and forwarding them to an external collection service as time series.
//!
//! This library provides tools for:
//! - Resolving the required columns of an uploaded CSV file
//! - Mapping data rows to per-parameter observation sequences
//! - Assembling the canonical time series model with explicit series identity
//! - Submitting the assembled time series to the collection service
//! - Serving the whole pipeline behind an HTTP upload endpoint

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod assembly;
        pub mod csv_mapper;
        pub mod upload;
    }
    pub mod http {
        pub mod api;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    HeaderExtra, HeaderId, ObservationBody, ObservationPosition, SeriesEntry, SeriesHeader,
    SeriesObservation, TimeSeries,
};
pub use config::Config;

/// Result type alias for boatload operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the upload pipeline
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required column is absent from the CSV header row
    #[error("CSV header missing column '{column}'")]
    MissingColumn { column: String },

    /// A data row carries a timestamp that is not an integer epoch second count
    #[error("Malformed timestamp '{value}' in data row {row}")]
    MalformedTimestamp { row: usize, value: String },

    /// The collection service rejected or failed to accept the time series
    #[error("Upstream submission failed{}: {message}", status_suffix(.status))]
    UpstreamSubmission {
        status: Option<u16>,
        message: String,
    },

    /// CSV parsing error
    #[error("CSV parsing error: {message}")]
    CsvParsing {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// The uploaded file has no header row
    #[error("CSV input is empty: no header row found")]
    EmptyInput,

    /// The request is missing or carries invalid fields
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" with status {code}"))
        .unwrap_or_default()
}

impl Error {
    /// Create a missing column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a malformed timestamp error for a zero-based data row
    pub fn malformed_timestamp(row: usize, value: impl Into<String>) -> Self {
        Self::MalformedTimestamp {
            row,
            value: value.into(),
        }
    }

    /// Create an upstream submission error
    pub fn upstream_submission(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::UpstreamSubmission {
            status,
            message: message.into(),
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::CsvParsing {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Whether the error was caused by the content of the request rather than
    /// by the service or its collaborators
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::MalformedTimestamp { .. }
                | Self::CsvParsing { .. }
                | Self::EmptyInput
                | Self::InvalidRequest { .. }
                | Self::DataValidation { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            message: error.to_string(),
            source: Some(error),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::UpstreamSubmission {
            status: error.status().map(|s| s.as_u16()),
            message: error.to_string(),
        }
    }
}
