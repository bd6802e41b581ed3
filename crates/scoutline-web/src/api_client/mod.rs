//! HTTP client for the Scoutline API
//!
//! Every request takes a [`Session`]; there is no ambient token. Non-2xx
//! responses become [`ClientError`]s and nothing is retried.

mod resource;
mod session;

pub use resource::{Coaches, Orders, Profiles, Resource};
pub use session::{Environment, Session, SessionStorage, TOKEN_STORAGE_KEY, auth_headers};

use crate::admin_table::TableQuery;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::{
    Body, Client, RequestBuilder, Response, StatusCode,
    multipart::{Form, Part},
};
use scoutline_api::handlers::{ErrorResponse, ListResponse};
use scoutline_core::{PaymentMetrics, Profile, Settings, config::ClientConfig};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Path suffix every API base ends with
pub const API_SUFFIX: &str = "/api/v1";

/// Bytes handed to the transport per progress report
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Errors returned by [`ApiClient`]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response, or the body could not be read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 401 or 403 from the backend
    #[error("access denied ({status}): {message}")]
    Unauthorized {
        /// HTTP status
        status: u16,
        /// Server-provided message
        message: String,
    },

    /// Any other non-2xx response
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status
        status: u16,
        /// Server-provided message
        message: String,
    },

    /// A 2xx response whose body was not what the endpoint promises
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// Whether the backend refused the credentials
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Ensure `base` ends with [`API_SUFFIX`] exactly once
///
/// Trailing slashes are ignored: `http://x`, `http://x/` and
/// `http://x/api/v1/` all become `http://x/api/v1`.
#[must_use]
pub fn normalize_api_base(base: &str) -> String {
    let mut origin = base.trim().trim_end_matches('/');
    while let Some(stripped) = origin.strip_suffix(API_SUFFIX) {
        origin = stripped.trim_end_matches('/');
    }
    format!("{origin}{API_SUFFIX}")
}

/// Client for the REST backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;
        Ok(Self::with_client(http, &config.api_base_url))
    }

    /// Wrap an existing HTTP client
    #[must_use]
    pub fn with_client(http: Client, base: &str) -> Self {
        Self {
            http,
            base: normalize_api_base(base),
        }
    }

    /// Normalized API base, ending in [`API_SUFFIX`]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// `GET <resource>` with table paging, sorting and search
    pub async fn list<R: Resource>(
        &self,
        session: &Session,
        query: &TableQuery,
    ) -> Result<ListResponse<R::Item>, ClientError> {
        let request = self.http.get(self.url(R::PATH)).query(query);
        self.send_json(request, session).await
    }

    /// `GET <resource>/:id`
    pub async fn get<R: Resource>(&self, session: &Session, id: Uuid) -> Result<R::Item, ClientError> {
        let request = self.http.get(self.url(&R::item_path(id)));
        self.send_json(request, session).await
    }

    /// `POST <resource>`
    pub async fn create<R: Resource>(
        &self,
        session: &Session,
        body: &R::Create,
    ) -> Result<R::Item, ClientError> {
        let request = self.http.post(self.url(R::PATH)).json(body);
        self.send_json(request, session).await
    }

    /// `PUT` to the resource's update path
    pub async fn update<R: Resource>(
        &self,
        session: &Session,
        id: Uuid,
        body: &R::Update,
    ) -> Result<R::Item, ClientError> {
        let request = self.http.put(self.url(&R::update_path(id))).json(body);
        self.send_json(request, session).await
    }

    /// `DELETE <resource>/:id`
    pub async fn delete<R: Resource>(&self, session: &Session, id: Uuid) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&R::item_path(id)));
        self.send(request, session).await.map(drop)
    }

    /// `GET /settings`
    pub async fn settings(&self, session: &Session) -> Result<Settings, ClientError> {
        let request = self.http.get(self.url("/settings"));
        self.send_json(request, session).await
    }

    /// `GET /settings` as an untyped document
    pub async fn settings_document(&self, session: &Session) -> Result<serde_json::Value, ClientError> {
        let request = self.http.get(self.url("/settings"));
        self.send_json(request, session).await
    }

    /// `GET /orders/metrics`
    pub async fn payment_metrics(&self, session: &Session) -> Result<PaymentMetrics, ClientError> {
        let request = self.http.get(self.url("/orders/metrics"));
        self.send_json(request, session).await
    }

    /// `POST /profiles/:id/media`, streaming `bytes` as the `file` part
    ///
    /// `progress` receives integer percentages, at most 99, as the body is
    /// handed to the transport, and a final 100 once the server has accepted
    /// the file. A rejected upload never reports 100.
    pub async fn upload_media<F>(
        &self,
        session: &Session,
        profile_id: Uuid,
        filename: &str,
        content_type: &str,
        bytes: Bytes,
        progress: F,
    ) -> Result<Profile, ClientError>
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let total = bytes.len() as u64;
        let progress = Arc::new(progress);

        let reporter = Arc::clone(&progress);
        let mut sent = 0_u64;
        let stream = futures::stream::iter(split_chunks(bytes, UPLOAD_CHUNK_SIZE)).map(move |chunk| {
            sent += chunk.len() as u64;
            reporter(percent_of(sent, total).min(99));
            Ok::<_, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let request = self
            .http
            .post(self.url(&format!("/profiles/{profile_id}/media")))
            .multipart(form);
        let profile = self.send_json(request, session).await?;

        progress(100);
        Ok(profile)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        session: &Session,
    ) -> Result<T, ClientError> {
        let response = self.send(request, session).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send(&self, request: RequestBuilder, session: &Session) -> Result<Response, ClientError> {
        let response = request.headers(session.headers()).send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "API response");

        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            _ => ClientError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}

fn split_chunks(mut bytes: Bytes, size: usize) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(bytes.len().div_ceil(size.max(1)));
    while bytes.len() > size {
        chunks.push(bytes.split_to(size));
    }
    if !bytes.is_empty() {
        chunks.push(bytes);
    }
    chunks
}

/// Integer percentage of `done` over `total`, capped at 100
#[must_use]
pub fn percent_of(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    u8::try_from(done.saturating_mul(100) / total).map_or(100, |pct| pct.min(100))
}
