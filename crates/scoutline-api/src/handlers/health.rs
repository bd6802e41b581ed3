//! Health check endpoints for monitoring and diagnostics

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Store connectivity status
    pub database: DatabaseHealth,
    /// Process uptime in seconds
    pub uptime_seconds: u64,
}

/// Store health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealth {
    /// Store backend in use (`memory` or `postgres`)
    pub backend: String,
    /// Whether the store answered the probe
    pub connected: bool,
    /// Probe round trip in milliseconds
    pub response_time_ms: u64,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Service readiness status
    pub ready: bool,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// `GET /health`
///
/// Returns 200 with store and uptime details, or 503 when the store probe fails.
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "timestamp": "2024-03-15T14:25:30Z",
///   "database": { "backend": "postgres", "connected": true, "response_time_ms": 3 },
///   "uptime_seconds": 3600
/// }
/// ```
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let database = check_database_health(&state).await.map_err(|e| {
        error!("Database health check failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    debug!(
        backend = %database.backend,
        response_time_ms = database.response_time_ms,
        "Health check completed"
    );

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        database,
        uptime_seconds: state.uptime_seconds(),
    }))
}

/// `GET /ready`
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    match state.repo.health_check().await {
        Ok(()) => Ok(Json(ReadinessResponse {
            ready: true,
            timestamp: chrono::Utc::now(),
        })),
        Err(e) => {
            error!("Readiness check failed - store not accessible: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

async fn check_database_health(state: &AppState) -> scoutline_core::Result<DatabaseHealth> {
    let start_time = Instant::now();
    state.repo.health_check().await?;

    Ok(DatabaseHealth {
        backend: state.repo.backend_name().to_string(),
        connected: true,
        response_time_ms: u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::handlers::profiles::fixtures::test_state;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_health_reports_memory_backend() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);

        let Json(health) = health_check(State(state)).await.unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.database.backend, "memory");
        assert!(health.database.connected);
    }

    #[tokio::test]
    async fn test_ready_with_memory_store() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);

        let Json(ready) = readiness_check(State(state)).await.unwrap();
        assert!(ready.ready);
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            database: DatabaseHealth {
                backend: "postgres".to_string(),
                connected: true,
                response_time_ms: 4,
            },
            uptime_seconds: 60,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["database"]["backend"], "postgres");
        assert_eq!(json["uptime_seconds"], 60);
    }
}
