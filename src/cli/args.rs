//! Command-line argument definitions for boatload
//!
//! This module defines the complete CLI interface using clap derive API.
//! Server options fall back to `BOATLOAD_*` environment variables.

use crate::config::{AuthMode, Config, OutputTimeZone};
use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PARAMETERS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_UPSTREAM_URL,
};
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the glider upload gateway
///
/// Accepts CSV files of glider readings and forwards them to the collection
/// service as time series.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "boatload",
    version,
    about = "Forward oceanographic glider CSV readings to a time series collection service",
    long_about = "Accepts CSV files of oceanographic glider readings over HTTP, maps every row to \
                  per-parameter observations with uncertain quality flags, and submits the \
                  resulting time series to the configured collection service."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Start the HTTP upload server
    Serve(ServeArgs),
    /// Convert a local CSV file to time series JSON
    Convert(ConvertArgs),
}

/// Arguments for the serve command
#[derive(Debug, Clone, Parser)]
pub struct ServeArgs {
    /// Address the HTTP server listens on
    #[arg(
        short = 'b',
        long = "bind",
        value_name = "ADDR",
        env = "BOATLOAD_BIND",
        default_value = DEFAULT_BIND_ADDR,
        help = "Address to listen on"
    )]
    pub bind: String,

    /// Base URL of the collection service
    #[arg(
        long = "upstream-url",
        value_name = "URL",
        env = "BOATLOAD_UPSTREAM_URL",
        default_value = DEFAULT_UPSTREAM_URL,
        help = "Base URL of the time series collection service"
    )]
    pub upstream_url: String,

    /// Authentication used towards the collection service
    #[arg(
        long = "auth-mode",
        value_enum,
        env = "BOATLOAD_AUTH_MODE",
        default_value = "development",
        help = "Authentication mode for the collection service"
    )]
    pub auth_mode: AuthMode,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Maximum accepted upload size in MiB
    #[arg(
        long = "max-upload-mb",
        value_name = "MB",
        env = "BOATLOAD_MAX_UPLOAD_MB",
        default_value_t = DEFAULT_MAX_UPLOAD_MB,
        help = "Maximum upload size in MiB"
    )]
    pub max_upload_mb: usize,

    /// Deadline for a whole upload request
    #[arg(
        long = "request-timeout-secs",
        value_name = "SECS",
        env = "BOATLOAD_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS,
        help = "Request deadline in seconds"
    )]
    pub request_timeout_secs: u64,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// CSV file to convert
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output file for the JSON time series
    ///
    /// If not specified, outputs to stdout
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output file for the JSON time series"
    )]
    pub output: Option<PathBuf>,

    /// Print only series headers without observations
    #[arg(long = "headers-only", help = "Print series headers only")]
    pub headers_only: bool,

    /// Category label of the time series
    #[arg(long = "tstype", value_name = "TYPE", help = "Time series type")]
    pub tstype: String,

    /// Research vessel identifier
    #[arg(long = "glider-id", value_name = "ID", help = "Glider identifier")]
    pub glider_id: String,

    /// Name of the association contributing data
    #[arg(long = "source", value_name = "NAME", default_value = "")]
    pub source: String,

    /// Name of the vessel
    #[arg(long = "name", value_name = "NAME", default_value = "")]
    pub name: String,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Pretty-print the JSON output
    #[arg(long = "pretty")]
    pub pretty: bool,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Options controlling how CSV rows are mapped
#[derive(Debug, Clone, clap::Args)]
pub struct MappingArgs {
    /// Time zone used to render observation timestamps
    #[arg(
        long = "time-zone",
        value_name = "TZ",
        env = "BOATLOAD_TIME_ZONE",
        default_value = "UTC",
        help = "Output time zone: UTC or a fixed offset such as +02:00"
    )]
    pub time_zone: OutputTimeZone,

    /// Parameter columns to extract (comma-separated list)
    #[arg(
        short = 'p',
        long = "parameters",
        value_name = "LIST",
        env = "BOATLOAD_PARAMETERS",
        help = "Comma-separated list of parameter columns (default: temperature,conductivity)"
    )]
    pub parameters: Option<ParameterList>,
}

impl MappingArgs {
    /// Requested parameters, or the defaults when none were given
    pub fn get_parameters(&self) -> Vec<String> {
        match &self.parameters {
            Some(list) => list.parameters.clone(),
            None => DEFAULT_PARAMETERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Logging verbosity flags shared by all commands
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VerbosityArgs {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl VerbosityArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Wrapper for parsing comma-separated parameter lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterList {
    pub parameters: Vec<String>,
}

impl FromStr for ParameterList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parameters: Vec<String> = s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if parameters.is_empty() {
            return Err(Error::configuration("Parameter list cannot be empty"));
        }

        Ok(ParameterList { parameters })
    }
}

impl ServeArgs {
    /// Build and validate the server configuration
    pub fn to_config(&self) -> Result<Config> {
        let config = Config::default()
            .with_bind_addr(&self.bind)
            .with_upstream_url(&self.upstream_url)
            .with_auth_mode(self.auth_mode)
            .with_max_upload_mb(self.max_upload_mb)?
            .with_request_timeout_secs(self.request_timeout_secs)
            .with_time_zone(self.mapping.time_zone)
            .with_default_parameters(self.mapping.get_parameters());

        config.validate()?;
        Ok(config)
    }
}

impl ConvertArgs {
    /// Validate the convert command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.input.display()
            )));
        }

        if let Some(output) = &self.output {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output file directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }
}
