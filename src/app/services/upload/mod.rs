//! Upload service
//!
//! Hands assembled time series to the collection service. The actual
//! submission capability sits behind [`TimeSeriesSubmitter`] and is injected at
//! construction, so the HTTP layer and tests can swap it freely.

pub mod authenticator;
pub mod met_service;

pub use authenticator::Authenticator;
pub use met_service::MetServiceClient;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::app::models::TimeSeries;
use crate::config::UpstreamConfig;
use crate::Result;

/// Capability of delivering a time series to the collection service
#[async_trait]
pub trait TimeSeriesSubmitter: Send + Sync {
    async fn submit(&self, time_series: &TimeSeries) -> Result<()>;
}

/// Application service forwarding validated time series to a submitter
#[derive(Clone)]
pub struct UploadService {
    submitter: Arc<dyn TimeSeriesSubmitter>,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish_non_exhaustive()
    }
}

impl UploadService {
    pub fn new(submitter: Arc<dyn TimeSeriesSubmitter>) -> Self {
        Self { submitter }
    }

    /// Create a service submitting to the configured collection service
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let client = MetServiceClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Validate and submit a time series exactly once
    pub async fn upload_time_series(&self, time_series: &TimeSeries) -> Result<()> {
        time_series.validate()?;

        info!(
            "Uploading time series '{}': {} series, {} observations",
            time_series.ts_type,
            time_series.entries.len(),
            time_series.observation_count()
        );

        match self.submitter.submit(time_series).await {
            Ok(()) => {
                info!("Time series '{}' accepted", time_series.ts_type);
                Ok(())
            }
            Err(e) => {
                error!("Time series '{}' rejected: {}", time_series.ts_type, e);
                Err(e)
            }
        }
    }
}
