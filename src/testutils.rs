use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::configuration::{BackendConfig, Configuration, ImageDomain};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub authorization: Option<String>,
    pub prefer: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub struct FakeBackendInner {
    pub requests: Mutex<Vec<RecordedRequest>>,
    pub canned_response: Mutex<Option<(u16, String)>>,
}

/// In-process stand-in for the hosted backend's REST interface. Echoes
/// inserted rows back with generated `id` and `created_at`.
#[derive(Clone)]
pub struct FakeBackend {
    inner: Arc<FakeBackendInner>,
    address: std::net::SocketAddr,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let inner = Arc::new(FakeBackendInner::default());
        let app = Router::new()
            .route("/rest/v1/:table", post(insert_rows))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { inner, address }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn respond_with(&self, status: u16, body: &str) {
        *self.inner.canned_response.lock().unwrap() = Some((status, body.to_string()));
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

async fn insert_rows(
    State(inner): State<Arc<FakeBackendInner>>,
    Path(table): Path<String>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    inner.requests.lock().unwrap().push(RecordedRequest {
        path: format!("/rest/v1/{table}"),
        api_key: header(&headers, "apikey"),
        authorization: header(&headers, "authorization"),
        prefer: header(&headers, "prefer"),
        body: body.clone(),
    });

    if let Some((status, canned)) = inner.canned_response.lock().unwrap().clone() {
        let status = StatusCode::from_u16(status).unwrap();
        return (status, canned);
    }

    let mut row = body;
    row["id"] = json!(Uuid::new_v4());
    row["created_at"] = json!(Utc::now());
    (StatusCode::CREATED, json!([row]).to_string())
}

#[derive(Clone)]
pub struct TestConfiguration {
    pub backend: BackendConfig,
    pub image_domains: Vec<ImageDomain>,
}

impl TestConfiguration {
    pub fn new(backend_url: &str) -> Self {
        Self {
            backend: BackendConfig::new(Some(backend_url.into()), Some("test-key".into())).unwrap(),
            image_domains: vec![ImageDomain::parse("images.unsplash.com").unwrap()],
        }
    }
}

impl Configuration for TestConfiguration {
    fn website_title(&self) -> String {
        "Test Bookings".into()
    }

    fn port(&self) -> String {
        "0".into()
    }

    fn backend(&self) -> BackendConfig {
        self.backend.clone()
    }

    fn image_domains(&self) -> Vec<ImageDomain> {
        self.image_domains.clone()
    }
}
