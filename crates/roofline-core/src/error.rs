use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors raised by shared plumbing (extractors, layers) before a service handler runs.
///
/// Services define their own richer error enums; this one covers the cases every
/// service shares and renders the same `{"kind", "message"}` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Render an error body in the shared `{"kind", "message"}` shape.
pub fn error_body(status: StatusCode, kind: &str, message: String) -> Response {
    let body = serde_json::json!({
        "kind": kind,
        "message": message,
    });
    (status, axum::Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log 500s only. TraceLayer already records method/uri/status for all requests.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        error_body(self.status(), self.kind(), self.to_string())
    }
}
