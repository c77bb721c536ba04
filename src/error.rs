use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::inference::InvokeError;
use crate::models::ErrorBody;
use crate::routes::cors_response;

/// Every way a prediction request can end early. None of them are retried.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("SAGEMAKER_ENDPOINT_NAME environment variable not set")]
    MissingEndpoint,

    #[error("SageMaker client failed to initialize")]
    ClientUnavailable,

    #[error("Could not read request body: {0}")]
    UnreadableBody(actix_web::Error),

    #[error("Invalid JSON input format")]
    InvalidInput(#[source] serde_json::Error),

    #[error("Error calling SageMaker: {0}")]
    Upstream(#[from] InvokeError),

    #[error("Could not parse prediction result from model")]
    UnparseableResult,
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            PredictError::UnreadableBody(e) => e.as_response_error().status_code(),
            PredictError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        cors_response(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_faults_are_400_everything_else_500() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            PredictError::InvalidInput(bad_json).status_code(),
            StatusCode::BAD_REQUEST
        );

        for err in [
            PredictError::MissingEndpoint,
            PredictError::ClientUnavailable,
            PredictError::Upstream(InvokeError("timed out".into())),
            PredictError::UnparseableResult,
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn unreadable_body_keeps_framework_status() {
        let err = PredictError::UnreadableBody(actix_web::error::PayloadError::Overflow.into());
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.to_string().starts_with("Could not read request body: "));
    }

    #[test]
    fn upstream_message_embeds_detail() {
        let err = PredictError::Upstream(InvokeError("connection refused".into()));
        assert_eq!(err.to_string(), "Error calling SageMaker: connection refused");
    }
}
