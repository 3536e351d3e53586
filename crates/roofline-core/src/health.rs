use axum::extract::State;
use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

use crate::error::AppError;

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`: ready once the database answers a ping.
///
/// Services expose their connection through `FromRef<AppState> for DatabaseConnection`.
pub async fn readyz(State(db): State<DatabaseConnection>) -> StatusCode {
    match db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Router fallback for unknown paths.
pub async fn route_not_found() -> AppError {
    AppError::NotFound
}
