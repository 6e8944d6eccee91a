//! Serve command implementation

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::shared::setup_logging;
use crate::Result;
use crate::app::http::api::{self, AppState};
use crate::cli::args::ServeArgs;

/// Run the HTTP upload server until shutdown is requested
pub async fn run_serve(args: ServeArgs, shutdown: CancellationToken) -> Result<()> {
    setup_logging(&args.verbosity)?;

    let config = args.to_config()?;
    info!(
        "Starting boatload v{} (upstream {})",
        env!("CARGO_PKG_VERSION"),
        config.upstream.base_url
    );

    let state = AppState::from_config(&config)?;
    info!(
        "Rendering observation times in {} for parameters {}",
        state.mapper.time_zone(),
        state.default_parameters.join(",")
    );
    let listener = api::bind(&config.server).await?;

    api::serve(listener, state, &config.server, shutdown).await
}
