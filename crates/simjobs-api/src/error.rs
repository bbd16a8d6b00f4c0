//! Interface error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::job::{JobStatus, ValidationError};
use simjobs_workqueue::QueueError;

/// Interface error types.
#[derive(Debug, Error)]
pub enum InterfaceError {
    /// No live job with this id.
    #[error("Simulation not found: {0}")]
    NotFound(Uuid),

    /// The path segment is not a job id.
    #[error("Invalid simulation id: {0}")]
    InvalidId(String),

    /// A job with this id already exists.
    #[error("Simulation already exists: {0}")]
    DuplicateKey(Uuid),

    /// The job has already left the pending state.
    #[error("Simulation {id} is already {status}")]
    InvalidTransition { id: Uuid, status: JobStatus },

    /// The request body could not be parsed.
    #[error("{0}")]
    MalformedBody(String),

    /// Submission rejected by request validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The task queue refused the job.
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// CORS settings cannot be turned into a layer.
    #[error("Invalid CORS configuration: {0}")]
    InvalidCors(String),
}

impl IntoResponse for InterfaceError {
    fn into_response(self) -> Response {
        match self {
            // Absence is reported in the body, not the status
            InterfaceError::NotFound(_) => {
                Json(json!({"error": "Simulation not found"})).into_response()
            }
            InterfaceError::InvalidId(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": self.to_string()})),
            )
                .into_response(),
            InterfaceError::MalformedBody(_) | InterfaceError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": self.to_string()})),
            )
                .into_response(),
            InterfaceError::Queue(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"detail": e.to_string()})),
            )
                .into_response(),
            e => {
                error!("Request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_not_found_display() {
        let id = Uuid::new_v4();
        let err = InterfaceError::NotFound(id);
        assert_eq!(err.to_string(), format!("Simulation not found: {}", id));
    }

    #[test]
    fn test_invalid_transition_display() {
        let id = Uuid::new_v4();
        let err = InterfaceError::InvalidTransition {
            id,
            status: JobStatus::Completed,
        };
        assert!(err.to_string().ends_with("is already completed"));
    }

    #[test]
    fn test_validation_is_transparent() {
        let err = InterfaceError::from(ValidationError::NameRequired);
        assert_eq!(err.to_string(), "Name is required");
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = InterfaceError::NotFound(Uuid::new_v4()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await["error"], "Simulation not found");
    }

    #[tokio::test]
    async fn test_invalid_id_response() {
        let response = InterfaceError::InvalidId("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await["error"], "Invalid simulation id: abc");
    }

    #[tokio::test]
    async fn test_validation_response() {
        let response = InterfaceError::from(ValidationError::EndNotAfterStart).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(response).await["detail"],
            "End date must be after start date"
        );
    }

    #[tokio::test]
    async fn test_queue_response() {
        let response = InterfaceError::from(QueueError::QueueFull).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_of(response).await["detail"], "Queue is full");
    }

    #[tokio::test]
    async fn test_internal_error_response() {
        let response = InterfaceError::DuplicateKey(Uuid::new_v4()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
