//! Errors raised at the HTTP boundary, and the request-id correlation
//! middleware every route runs behind.

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode, header::HeaderName},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use sluice_core::{LifecycleError, RequestId, SessionId, SessionStoreError};
use tracing::{error, warn};

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can reach an Axum handler, trimmed to the kinds the
/// lifecycle core actually produces.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Rejected because the controller has started draining.
    #[error(transparent)]
    NotAccepting(#[from] NotAcceptingError),

    /// The execution for this session was aborted mid-flight.
    #[error("execution for session {session} was aborted")]
    Aborted { session: SessionId, state_saved: bool },

    /// The session store failed to read or write.
    #[error("session store operation failed: {0}")]
    StoreFailure(String),

    /// A stored value could not be deserialized.
    #[error("failed to deserialize session state: {0}")]
    SerializationFailure(String),

    /// Persisting the interrupted marker failed after an abort.
    #[error("failed to persist interrupted marker: {0}")]
    InterruptFailure(String),
}

#[derive(Debug, thiserror::Error)]
#[error("controller is not accepting new executions (state: {state})")]
pub struct NotAcceptingError {
    pub state: &'static str,
}

impl From<LifecycleError> for RuntimeError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotAccepting { state } => {
                RuntimeError::NotAccepting(NotAcceptingError { state })
            }
            LifecycleError::Aborted { session, state_saved } => {
                RuntimeError::Aborted { session, state_saved }
            }
            LifecycleError::InterruptFailure { details, .. } => {
                RuntimeError::InterruptFailure(details)
            }
        }
    }
}

impl From<SessionStoreError> for RuntimeError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::StoreFailure { operation, details } => {
                RuntimeError::StoreFailure(format!("{operation}: {details}"))
            }
            SessionStoreError::SerializationFailure { field, details } => {
                RuntimeError::SerializationFailure(format!("{field}: {details}"))
            }
        }
    }
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl IntoResponse for RuntimeError {
    fn into_response(self) -> Response {
        match self {
            RuntimeError::NotAccepting(inner) => {
                let body = ErrorResponse {
                    code: "not_accepting",
                    message: inner.to_string(),
                    session_id: None,
                };
                (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
            }
            // The client always gets a response naming the session it asked
            // about, even though the execution didn't complete normally.
            RuntimeError::Aborted { session, state_saved } => {
                let body = ErrorResponse {
                    code: "aborted",
                    message: format!(
                        "execution interrupted before completing (state_saved: {state_saved})"
                    ),
                    session_id: Some(session.to_string()),
                };
                (StatusCode::OK, Json(body)).into_response()
            }
            RuntimeError::StoreFailure(details) => {
                error!(error = %details, "session store failure surfaced to client");
                internal_error("store_failure", "session store operation failed")
            }
            RuntimeError::SerializationFailure(details) => {
                warn!(error = %details, "serialization failure surfaced to client");
                internal_error("serialization_failure", "failed to decode session state")
            }
            RuntimeError::InterruptFailure(details) => {
                warn!(error = %details, "interrupted-marker write failed");
                internal_error("interrupt_failure", "failed to record interruption")
            }
        }
    }
}

fn internal_error(code: &'static str, message: &str) -> Response {
    let body = ErrorResponse {
        code,
        message: message.to_string(),
        session_id: None,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Request extension carrying the correlation id for this request.
#[derive(Debug, Clone)]
pub struct RequestIdExtension(pub RequestId);

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Extracts `x-request-id` from the incoming request, generating one if
/// absent, and echoes it back on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| RequestId::parse(s).ok())
        .unwrap_or_else(RequestId::generate);

    request
        .extensions_mut()
        .insert(RequestIdExtension(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_accepting_maps_to_503() {
        let err = RuntimeError::from(LifecycleError::NotAccepting { state: "Draining" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn aborted_maps_to_200_with_session_id() {
        let session = SessionId::generate();
        let err = RuntimeError::from(LifecycleError::Aborted {
            session: session.clone(),
            state_saved: true,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn store_failure_maps_to_500() {
        let err = RuntimeError::from(SessionStoreError::StoreFailure {
            operation: "save",
            details: "disk full".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
