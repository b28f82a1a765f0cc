//! Typed handle to the hosted backend's REST interface.

use crate::backend::BookingBackend;
use crate::configuration::{BackendConfig, ConfigError};
use crate::types::{Booking, NewBooking};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

const REST_PATH: &str = "rest/v1";

/// A collection of the hosted backend together with the row shapes used to
/// read and insert it.
pub trait Table: DeserializeOwned + Send + 'static {
    const NAME: &'static str;
    type Insert: Serialize + Sync;
}

impl Table for Booking {
    const NAME: &'static str = "bookings";
    type Insert = NewBooking;
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend rejected request ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Backend returned no rows")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl ApiErrorBody {
    fn describe(self) -> Option<String> {
        let message = self.message?;
        Some(match (self.details, self.hint) {
            (Some(details), _) => format!("{message} ({details})"),
            (None, Some(hint)) => format!("{message} ({hint})"),
            (None, None) => message,
        })
    }
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    rest_url: Url,
}

/// Builds a fresh client for the configured backend. No request is sent.
pub fn create_client(config: &BackendConfig) -> Result<BackendClient, ConfigError> {
    let mut headers = HeaderMap::new();
    let api_key =
        HeaderValue::from_str(config.anon_key()).map_err(|_| ConfigError::InvalidAnonKey)?;
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.anon_key()))
        .map_err(|_| ConfigError::InvalidAnonKey)?;
    bearer.set_sensitive(true);
    headers.insert("apikey", api_key);
    headers.insert(AUTHORIZATION, bearer);

    let http = reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|err| ConfigError::InvalidUrl {
            url: config.url().to_string(),
            reason: err.to_string(),
        })?;

    Ok(BackendClient {
        http,
        rest_url: rest_url(config.url())?,
    })
}

fn rest_url(base: &Url) -> Result<Url, ConfigError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base.join(&format!("{REST_PATH}/"))
        .map_err(|err| ConfigError::InvalidUrl {
            url: base.to_string(),
            reason: err.to_string(),
        })
}

impl BackendClient {
    pub fn table_url<T: Table>(&self) -> Url {
        let mut url = self.rest_url.clone();
        url.path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().push(T::NAME);
            })
            .ok();
        url
    }

    /// Inserts one row and returns it as stored by the backend.
    pub async fn insert<T: Table>(&self, row: &T::Insert) -> Result<T, BackendError> {
        let url = self.table_url::<T>();
        debug!(%url, table = T::NAME, "Inserting row");

        let response = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(ApiErrorBody::describe)
                .unwrap_or(body);
            error!(%status, table = T::NAME, reason = %message, "Backend rejected insert");
            return Err(BackendError::Api { status, message });
        }

        let mut rows: Vec<T> = response.json().await?;
        if rows.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(rows.swap_remove(0))
    }
}

#[async_trait]
impl BookingBackend for BackendClient {
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, BackendError> {
        self.insert::<Booking>(booking).await
    }
}
