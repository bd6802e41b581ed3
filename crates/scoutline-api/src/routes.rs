//! API route definitions and middleware stack

use crate::{
    handlers::{self, ApiError, api_error},
    middleware::{auth::require_admin_token, logging::request_logging_middleware},
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri, header},
    middleware,
    routing::{delete, get, post, put},
};
use scoutline_core::config::ApiConfig;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

/// Prefix every resource route is mounted under
pub const API_PREFIX: &str = "/api/v1";

/// Build the complete application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = usize::try_from(state.config.security.max_upload_size).unwrap_or(usize::MAX);
    let timeout = Duration::from_secs(state.config.security.request_timeout);

    Router::new()
        .merge(health_routes())
        .nest(API_PREFIX, api_routes(&state))
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(cors_layer(&state.config.api))
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Resource routes; write operations sit behind the admin token gate
pub fn api_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let auth = middleware::from_fn_with_state(Arc::clone(state), require_admin_token);

    let orders = Router::new()
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/orders/metrics", get(handlers::orders::payment_metrics))
        .route(
            "/orders/:id",
            get(handlers::orders::get_order).delete(handlers::orders::delete_order),
        )
        .route(
            "/orders/:id/status",
            put(handlers::orders::update_order_status),
        )
        .route_layer(auth.clone());

    Router::new()
        .route(
            "/profiles",
            get(handlers::profiles::list_profiles)
                .merge(post(handlers::profiles::create_profile).route_layer(auth.clone())),
        )
        .route(
            "/profiles/:id",
            get(handlers::profiles::get_profile).merge(
                put(handlers::profiles::update_profile)
                    .merge(delete(handlers::profiles::delete_profile))
                    .route_layer(auth.clone()),
            ),
        )
        .route(
            "/profiles/:id/media",
            post(handlers::media::upload_media).route_layer(auth.clone()),
        )
        .route(
            "/coaches",
            get(handlers::profiles::list_coaches)
                .merge(post(handlers::profiles::create_coach).route_layer(auth.clone())),
        )
        .route(
            "/coaches/:id",
            get(handlers::profiles::get_coach).merge(
                put(handlers::profiles::update_coach)
                    .merge(delete(handlers::profiles::delete_coach))
                    .route_layer(auth.clone()),
            ),
        )
        .route(
            "/settings",
            get(handlers::settings::get_settings)
                .merge(put(handlers::settings::put_settings).route_layer(auth)),
        )
        .merge(orders)
}

/// Build health check routes (no authentication required)
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
}

fn cors_layer(api: &ApiConfig) -> CorsLayer {
    if !api.enable_cors {
        return CorsLayer::new();
    }

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ]);

    if api.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

async fn route_not_found(uri: Uri) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        format!("Route not found: {}", uri.path()),
        "NOT_FOUND",
    )
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::handlers::profiles::fixtures::test_state;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const ADMIN_TOKEN: &str = "secret";

    fn app(temp_dir: &TempDir) -> Router {
        let state = test_state(temp_dir);
        let mut state = (*state).clone();
        state
            .admin_token_hashes
            .insert(format!("{:x}", md5::compute(ADMIN_TOKEN)));
        build_router(Arc::new(state))
    }

    fn profile_body() -> Value {
        json!({
            "kind": "player",
            "first_name": "Ana",
            "last_name": "Souza",
            "email": "ana@example.com",
            "sport": "football",
            "position": "goalkeeper",
            "nationality": "br"
        })
    }

    fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_profile_requires_token() {
        let temp_dir = TempDir::new().unwrap();
        let response = app(&temp_dir)
            .oneshot(post_json("/api/v1/profiles", &profile_body(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_unknown_token_rejected_before_validation() {
        let temp_dir = TempDir::new().unwrap();
        let response = app(&temp_dir)
            .oneshot(post_json("/api/v1/profiles", &json!({}), Some("wrong")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_create_then_list_profiles() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(&temp_dir);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/profiles",
                &profile_body(),
                Some(ADMIN_TOKEN),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::get("/api/v1/profiles?search=souza")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["data"][0]["first_name"], "Ana");
    }

    #[tokio::test]
    async fn test_invalid_profile_is_validation_failure() {
        let temp_dir = TempDir::new().unwrap();
        let mut body = profile_body();
        body["email"] = json!("not-an-email");

        let response = app(&temp_dir)
            .oneshot(post_json("/api/v1/profiles", &body, Some(ADMIN_TOKEN)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert!(body["details"]["email"].is_array());
    }

    #[tokio::test]
    async fn test_orders_listing_is_protected() {
        let temp_dir = TempDir::new().unwrap();
        let response = app(&temp_dir)
            .oneshot(Request::get("/api/v1/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_settings_read_is_public() {
        let temp_dir = TempDir::new().unwrap();
        let response = app(&temp_dir)
            .oneshot(Request::get("/api/v1/settings").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(json_body(response).await["seo"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let temp_dir = TempDir::new().unwrap();
        let response = app(&temp_dir)
            .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_health_route() {
        let temp_dir = TempDir::new().unwrap();
        let response = app(&temp_dir)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
