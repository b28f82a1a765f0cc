use crate::backend::BookingBackend;
use crate::configuration::Configuration;
use crate::format::DisplayFormat;
use crate::page::{render_page, BookingForm};
use crate::types::{BookingConfirmation, BookingRequest, NewBooking};
use crate::vitals::{Metric, VitalsReporter};
use axum::http::{header, HeaderValue};
use axum::response::{Html, Response};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use validator::Validate;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BookingBackend>,
    pub vitals: VitalsReporter,
    pub display: DisplayFormat,
    pub page: Arc<RenderedPage>,
}

pub struct RenderedPage {
    html: String,
    content_security_policy: HeaderValue,
}

impl RenderedPage {
    pub fn new<C: Configuration>(configuration: &C) -> Self {
        let image_sources: String = configuration
            .image_domains()
            .iter()
            .map(|domain| format!(" https://{}", domain.as_str()))
            .collect();
        let policy = format!(
            "default-src 'self'; script-src 'self' 'unsafe-inline'; \
             style-src 'self' 'unsafe-inline'; img-src 'self'{image_sources}"
        );

        Self {
            html: render_page(&configuration.website_title(), &BookingForm),
            content_security_policy: HeaderValue::from_str(&policy)
                .unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'")),
        }
    }
}

pub fn create_app<B: BookingBackend, C: Configuration>(
    backend: B,
    vitals: VitalsReporter,
    configuration: C,
) -> Router {
    let state = AppState {
        backend: Arc::new(backend),
        vitals,
        display: DisplayFormat::default(),
        page: Arc::new(RenderedPage::new(&configuration)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(get_page))
        .route("/bookings", post(create_booking))
        .route("/vitals", post(report_vital))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
}

async fn get_page(State(state): State<AppState>) -> Response {
    let mut response = Html(state.page.html.clone()).into_response();
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        state.page.content_security_policy.clone(),
    );
    response
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), (StatusCode, String)> {
    let request = request.normalized();
    if let Err(errors) = request.validate() {
        warn!(%errors, "Rejected booking request");
        return Err((StatusCode::UNPROCESSABLE_ENTITY, errors.to_string()));
    }

    let booking = NewBooking::from(request);
    match state.backend.create_booking(&booking).await {
        Ok(created) => {
            info!(id = %created.id, date = %created.date, time = %created.time, "Booking created");
            Ok((
                StatusCode::CREATED,
                Json(BookingConfirmation::new(&created, &state.display)),
            ))
        }
        Err(err) => {
            error!(%err, "Booking can't be created");
            Err((
                StatusCode::BAD_GATEWAY,
                format!("Booking could not be saved: {err}"),
            ))
        }
    }
}

async fn report_vital(State(state): State<AppState>, Json(metric): Json<Metric>) -> StatusCode {
    if state.vitals.report(metric) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
