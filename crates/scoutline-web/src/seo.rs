//! SEO metadata republished from the backend settings

use crate::{
    api_client::{ClientError, Environment, Session},
    state::WebState,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::error;

/// Message returned when settings cannot be loaded
pub const SEO_LOAD_FAILED: &str = "Failed to load SEO settings";

/// `{ seo: {...} }`
#[derive(Debug, Serialize)]
pub struct SeoResponse {
    /// The `seo` object of the settings document
    pub seo: Map<String, Value>,
}

/// `{ error: "..." }`
#[derive(Debug, Serialize)]
pub struct SeoError {
    /// Error message
    pub error: &'static str,
}

/// `GET /api/seo`
///
/// # Errors
///
/// Responds 500 when the backend call fails or its body has no `seo` object.
pub async fn get_seo(
    State(state): State<Arc<WebState>>,
) -> Result<Json<SeoResponse>, (StatusCode, Json<SeoError>)> {
    let session = Session::from_env(Environment::Server);
    match load_seo(&state, &session).await {
        Ok(seo) => Ok(Json(SeoResponse { seo })),
        Err(e) => {
            error!("Failed to load SEO settings: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SeoError {
                    error: SEO_LOAD_FAILED,
                }),
            ))
        }
    }
}

async fn load_seo(state: &WebState, session: &Session) -> Result<Map<String, Value>, ClientError> {
    let document = state.api.settings_document(session).await?;
    extract_seo(document)
}

fn extract_seo(document: Value) -> Result<Map<String, Value>, ClientError> {
    match document {
        Value::Object(mut settings) => match settings.remove("seo") {
            Some(Value::Object(seo)) => Ok(seo),
            Some(_) => Err(ClientError::UnexpectedResponse(
                "settings.seo is not an object".to_string(),
            )),
            None => Err(ClientError::UnexpectedResponse(
                "settings has no seo field".to_string(),
            )),
        },
        _ => Err(ClientError::UnexpectedResponse(
            "settings is not an object".to_string(),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api_client::ApiClient;
    use crate::routes::build_routes;
    use axum::{body::Body, http::Request};
    use pretty_assertions::assert_eq;
    use reqwest::Client;
    use scoutline_core::Config;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn call_seo(upstream: &MockServer) -> (StatusCode, Value) {
        let api = ApiClient::with_client(Client::new(), &upstream.uri());
        let state = Arc::new(WebState::with_client(Config::default(), api));
        let response = build_routes()
            .with_state(state)
            .oneshot(Request::get("/api/seo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_republishes_seo_object() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "site_name": "Scoutline",
                "contact_email": "hello@scoutline.example",
                "seo": {"title": "Scoutline", "keywords": ["football", "scouting"]}
            })))
            .mount(&upstream)
            .await;

        let (status, body) = call_seo(&upstream).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"seo": {"title": "Scoutline", "keywords": ["football", "scouting"]}})
        );
    }

    #[tokio::test]
    async fn test_upstream_error_is_500() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&upstream)
            .await;

        let (status, body) = call_seo(&upstream).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": SEO_LOAD_FAILED}));
    }

    #[tokio::test]
    async fn test_missing_seo_is_500() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"site_name": "x"})))
            .mount(&upstream)
            .await;

        let (status, _) = call_seo(&upstream).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_extract_seo_rejects_non_objects() {
        assert!(extract_seo(json!({"seo": "title"})).is_err());
        assert!(extract_seo(json!([1])).is_err());
        assert!(extract_seo(json!({"seo": {}})).unwrap().is_empty());
    }
}
