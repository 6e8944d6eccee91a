//! Command implementations for the boatload CLI
//!
//! Each command is implemented in its own module:
//! - `serve`: HTTP upload server
//! - `convert`: local CSV to time series JSON conversion

pub mod convert;
pub mod serve;
pub mod shared;

use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::cli::args::Commands;

/// Dispatch to the subcommand handler
///
/// `shutdown` is cancelled when the process is asked to stop.
pub async fn run(command: Commands, shutdown: CancellationToken) -> Result<()> {
    match command {
        Commands::Serve(serve_args) => serve::run_serve(serve_args, shutdown).await,
        Commands::Convert(convert_args) => convert::run_convert(convert_args).await,
    }
}
