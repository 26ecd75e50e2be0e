//! Server error types and handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_api_contract::ProblemDetails;

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types.
///
/// Filtering decisions are deliberately not errors; they return 200 with a
/// context body so the event source never retries them. Everything here is
/// either a permanent rejection (401) or a failure of the whole request
/// (500); there is nothing to partially complete in a single-decision flow.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Signature verification failed: {0}")]
    Unauthorized(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Dispatch forward failed: {0}")]
    DispatchFailed(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Convert error to Problem+JSON response
    pub fn to_problem(&self) -> ProblemDetails {
        match self {
            ServerError::Unauthorized(msg) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/signature".to_string(),
                title: "Signature Verification Failed".to_string(),
                status: Some(StatusCode::UNAUTHORIZED.as_u16()),
                detail: msg.clone(),
            },
            ServerError::MalformedPayload(msg) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/payload".to_string(),
                title: "Malformed Payload".to_string(),
                status: Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                detail: format!("Event payload could not be parsed: {}", msg),
            },
            ServerError::RegistryUnavailable(msg) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/registry".to_string(),
                title: "Registry Unavailable".to_string(),
                status: Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                detail: format!("Registry state could not be determined: {}", msg),
            },
            ServerError::DispatchFailed(msg) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/dispatch".to_string(),
                title: "Dispatch Forward Failed".to_string(),
                status: Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                detail: msg.clone(),
            },
            ServerError::Internal(msg) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/internal".to_string(),
                title: "Internal Server Error".to_string(),
                status: Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                detail: msg.clone(),
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let problem = self.to_problem();
        let status = StatusCode::from_u16(problem.status.unwrap_or(500))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(problem)).into_response()
    }
}

/// Convert any error to ServerError
impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

/// Convert IO errors
impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_401() {
        let problem = ServerError::Unauthorized("bad signature".into()).to_problem();
        assert_eq!(problem.status, Some(401));
    }

    #[test]
    fn upstream_failures_map_to_500() {
        for err in [
            ServerError::RegistryUnavailable("timeout".into()),
            ServerError::DispatchFailed("status 502".into()),
            ServerError::MalformedPayload("not json".into()),
            ServerError::Internal("boom".into()),
        ] {
            assert_eq!(err.to_problem().status, Some(500));
        }
    }
}
