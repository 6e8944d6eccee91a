//! Application constants for boatload
//!
//! This module contains the column names, quality flag sentinels, routes and
//! default values used throughout the upload pipeline.

// =============================================================================
// CSV Column Names
// =============================================================================

/// Column holding the observation time as integer seconds since the epoch
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Column holding the latitude of the observation
pub const LAT_COLUMN: &str = "lat";

/// Column holding the longitude of the observation
pub const LON_COLUMN: &str = "lon";

/// Column holding the depth of the observation in meters
pub const DEPTH_COLUMN: &str = "depth";

/// Parameters mapped when a request does not name any
pub const DEFAULT_PARAMETERS: &[&str] = &["temperature", "conductivity"];

// =============================================================================
// Quality Control Constants
// =============================================================================

/// Quality control flag values understood by the collection service
pub mod quality_flags {
    /// Quality of the value is uncertain
    ///
    /// No column in the upload format carries an authoritative flag, so every
    /// ingested value and position is provisionally marked uncertain.
    pub const UNCERTAIN: &str = "2";
}

// =============================================================================
// HTTP Server Defaults
// =============================================================================

/// Route accepting multipart CSV uploads
pub const UPLOAD_ROUTE: &str = "/api/upload";

/// Liveness route
pub const HEALTH_ROUTE: &str = "/health";

/// Multipart field carrying the CSV file
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the comma-separated parameter list
pub const PARAMETERS_FIELD: &str = "parameters";

/// Multipart field carrying the time series type label
pub const TSTYPE_FIELD: &str = "tstype";

/// Multipart field carrying the glider identifier
pub const GLIDER_ID_FIELD: &str = "glider_id";

/// Multipart field carrying the contributing source name
pub const SOURCE_FIELD: &str = "source";

/// Multipart field carrying the vessel name
pub const NAME_FIELD: &str = "name";

/// Default server bind address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default maximum upload size in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: usize = 32;

/// Default overall request deadline in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Collection Service Defaults
// =============================================================================

/// Default base URL of the collection service
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8081";

/// Path registering new series (header-only payload)
pub const UPSTREAM_CREATE_PATH: &str = "/api/v1/timeseries/create";

/// Path receiving observations (full payload)
pub const UPSTREAM_PUT_PATH: &str = "/api/v1/timeseries/put";

/// Default timeout for a single collection service request in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Header carrying credentials to the collection service
pub const AUTH_HEADER: &str = "authentication";

/// Credential sent in development mode
pub const DEV_AUTH_TOKEN: &str = "Bearer: actual bear";

