//! HTTP upload API
//!
//! Exposes the CSV-to-time-series pipeline as a multipart upload endpoint.
//! Collaborators reach the handlers through [`AppState`].

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::app::services::assembly::{SeriesIdentity, assemble_mapping};
use crate::app::services::csv_mapper::CsvObservationMapper;
use crate::app::services::upload::UploadService;
use crate::config::{Config, MappingConfig, ServerConfig};
use crate::constants::{
    FILE_FIELD, GLIDER_ID_FIELD, HEALTH_ROUTE, NAME_FIELD, PARAMETERS_FIELD, SOURCE_FIELD,
    TSTYPE_FIELD, UPLOAD_ROUTE,
};
use crate::{Error, Result};

/// Shared collaborators of the upload handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub upload_service: UploadService,
    pub mapper: CsvObservationMapper,
    pub default_parameters: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(upload_service: UploadService, mapping: &MappingConfig) -> Self {
        Self {
            upload_service,
            mapper: CsvObservationMapper::new(mapping.time_zone),
            default_parameters: Arc::new(mapping.default_parameters.clone()),
        }
    }

    /// Build the state for a validated configuration, wiring the collection
    /// service client
    pub fn from_config(config: &Config) -> Result<Self> {
        let upload_service = UploadService::from_config(&config.upstream)?;
        Ok(Self::new(upload_service, &config.mapping))
    }
}

/// Body returned for an accepted upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub series: usize,
    pub observations: usize,
}

/// Error response rendered as `{"error": message}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = if error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, error.to_string())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            format!("Malformed multipart request: {}", rejection.body_text()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Upload failed ({}): {}", self.status, self.message);
        } else {
            warn!("Upload rejected ({}): {}", self.status, self.message);
        }
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// Fields collected from the multipart form
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<Vec<u8>>,
    parameters: Option<String>,
    tstype: String,
    glider_id: String,
    source: String,
    name: String,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> std::result::Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                FILE_FIELD => {
                    debug!("Receiving upload file {:?}", field.file_name());
                    form.file = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
                }
                PARAMETERS_FIELD => {
                    form.parameters = Some(field.text().await.map_err(multipart_error)?)
                }
                TSTYPE_FIELD => form.tstype = field.text().await.map_err(multipart_error)?,
                GLIDER_ID_FIELD => form.glider_id = field.text().await.map_err(multipart_error)?,
                SOURCE_FIELD => form.source = field.text().await.map_err(multipart_error)?,
                NAME_FIELD => form.name = field.text().await.map_err(multipart_error)?,
                other => debug!("Ignoring unknown form field '{}'", other),
            }
        }

        Ok(form)
    }

    fn identity(&self) -> SeriesIdentity {
        SeriesIdentity {
            tstype: self.tstype.trim().to_string(),
            glider_id: self.glider_id.trim().to_string(),
            source: self.source.trim().to_string(),
            name: self.name.trim().to_string(),
        }
    }
}

fn multipart_error(error: axum::extract::multipart::MultipartError) -> ApiError {
    let status = error.status();
    ApiError::new(status, format!("Malformed multipart request: {}", error.body_text()))
}

/// Parse a comma-separated parameter list, falling back to `defaults` when
/// the list names nothing
pub fn parse_parameters(raw: Option<&str>, defaults: &[String]) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if parsed.is_empty() {
        defaults.to_vec()
    } else {
        parsed
    }
}

/// Build the application router
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route(UPLOAD_ROUTE, post(upload_time_series))
        .route(HEALTH_ROUTE, get(health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured listen address
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| Error::io(format!("Failed to bind {}", config.bind_addr), e))
}

/// Serve the API until `shutdown` is cancelled
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    config: &ServerConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }

    axum::serve(listener, router(state, config))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| Error::io("HTTP server failed", e))?;

    info!("Server stopped");
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn upload_time_series(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Json<UploadResponse>, ApiError> {
    let form = UploadForm::read(multipart?).await?;

    let file = form
        .file
        .as_deref()
        .ok_or_else(|| Error::invalid_request(format!("Missing '{FILE_FIELD}' field")))?;

    let identity = form.identity();
    identity.validate()?;

    let parameters = parse_parameters(form.parameters.as_deref(), &state.default_parameters);
    let mapping = state.mapper.map(&parameters, file)?;
    let time_series = assemble_mapping(&identity, mapping)?;

    state.upload_service.upload_time_series(&time_series).await?;

    Ok(Json(UploadResponse {
        status: "ok".to_string(),
        series: time_series.entries.len(),
        observations: time_series.observation_count(),
    }))
}
