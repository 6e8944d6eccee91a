//! Integration tests for the collection service client
//!
//! A local axum server records what the client sends, standing in for the
//! collection service.

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri, header::CONTENT_TYPE},
    routing::post,
};
use boatload::app::http::api::{AppState, router};
use boatload::app::services::assembly::{SeriesIdentity, assemble_mapping};
use boatload::app::services::csv_mapper::CsvObservationMapper;
use boatload::app::services::upload::{MetServiceClient, TimeSeriesSubmitter, UploadService};
use boatload::config::{Config, OutputTimeZone, UpstreamConfig};
use boatload::{Error, TimeSeries};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;

const GLIDER_CSV: &str = "timestamp,lat,lon,depth,temperature,conductivity\n\
                          1631968840,58.144699,7.998280,33.33,69.69,420.69\n";

/// One request as seen by the collection service
#[derive(Debug, Clone)]
struct RecordedRequest {
    path: String,
    authentication: Option<String>,
    body: TimeSeries,
}

#[derive(Clone)]
struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    reply: StatusCode,
}

impl Recorder {
    fn new(reply: StatusCode) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply,
        }
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(recorder): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<TimeSeries>,
) -> (StatusCode, &'static str) {
    recorder.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        authentication: headers
            .get("authentication")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (recorder.reply, "recorded")
}

/// Start a recording collection service on an ephemeral port
async fn start_collection_service(recorder: Recorder) -> SocketAddr {
    let app = Router::new()
        .route("/api/v1/timeseries/create", post(record))
        .route("/api/v1/timeseries/put", post(record))
        .with_state(recorder);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn upstream_config(addr: SocketAddr) -> UpstreamConfig {
    UpstreamConfig {
        base_url: format!("http://{addr}"),
        timeout_secs: 5,
        ..UpstreamConfig::default()
    }
}

fn create_test_series() -> TimeSeries {
    let mapping = CsvObservationMapper::new(OutputTimeZone::utc())
        .map_str(
            &["temperature".to_string(), "conductivity".to_string()],
            GLIDER_CSV,
        )
        .unwrap();
    let identity = SeriesIdentity::new("glider", "niva_explorer", "NIVA", "Sea Explorer").unwrap();
    assemble_mapping(&identity, mapping).unwrap()
}

#[tokio::test]
async fn test_submit_registers_headers_then_puts_observations() {
    let recorder = Recorder::new(StatusCode::OK);
    let addr = start_collection_service(recorder.clone()).await;
    let client = MetServiceClient::new(&upstream_config(addr)).unwrap();

    let ts = create_test_series();
    client.submit(&ts).await.unwrap();

    let requests = recorder.requests();
    assert_eq!(requests.len(), 2);

    let create = &requests[0];
    assert_eq!(create.path, "/api/v1/timeseries/create");
    assert_eq!(create.body, ts.headers_only());
    assert_eq!(create.body.observation_count(), 0);

    let put = &requests[1];
    assert_eq!(put.path, "/api/v1/timeseries/put");
    assert_eq!(put.body, ts);
    assert_eq!(put.body.observation_count(), 2);

    for request in &requests {
        assert_eq!(
            request.authentication.as_deref(),
            Some("Bearer: actual bear")
        );
    }
}

#[tokio::test]
async fn test_submit_maps_rejection_to_upstream_error() {
    let recorder = Recorder::new(StatusCode::SERVICE_UNAVAILABLE);
    let addr = start_collection_service(recorder.clone()).await;
    let client = MetServiceClient::new(&upstream_config(addr)).unwrap();

    let result = client.submit(&create_test_series()).await;

    match result {
        Err(Error::UpstreamSubmission { status, message }) => {
            assert_eq!(status, Some(503));
            assert_eq!(message, "recorded");
        }
        other => panic!("expected UpstreamSubmission, got {:?}", other),
    }

    // Registration failed, so observations were never sent
    assert_eq!(recorder.requests().len(), 1);
}

#[tokio::test]
async fn test_upload_api_end_to_end() {
    let recorder = Recorder::new(StatusCode::OK);
    let addr = start_collection_service(recorder.clone()).await;

    let mut config = Config::default().with_time_zone("+02:00".parse().unwrap());
    config.upstream = upstream_config(addr);
    config.validate().unwrap();

    let app = router(AppState::from_config(&config).unwrap(), &config.server);

    let boundary = "end-to-end";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"tstype\"\r\n\r\nglider\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"glider_id\"\r\n\r\nniva\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"g.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n{GLIDER_CSV}\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&bytes));

    let requests = recorder.requests();
    assert_eq!(requests.len(), 2);
    let put = &requests[1].body;
    assert_eq!(put.entries[0].header.id.glider_id, "niva");
    assert_eq!(
        put.entries[0].observations[0].time,
        "2021-09-18T14:40:40+02:00"
    );
}

#[tokio::test]
async fn test_upload_service_from_config() {
    let recorder = Recorder::new(StatusCode::OK);
    let addr = start_collection_service(recorder.clone()).await;

    let service = UploadService::from_config(&upstream_config(addr)).unwrap();
    service
        .upload_time_series(&create_test_series())
        .await
        .unwrap();

    assert_eq!(recorder.requests().len(), 2);
}
