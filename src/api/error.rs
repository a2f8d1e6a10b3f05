use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::dto::FieldError;
use crate::services::ServiceError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// `{ "success": false, "error": { code, message, details? } }`
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

impl From<&ServiceError> for ErrorEnvelope {
    fn from(err: &ServiceError) -> Self {
        let message = match err {
            ServiceError::Internal(_) => String::from("An internal error occurred"),
            other => other.to_string(),
        };
        Self {
            success: false,
            error: ErrorBody {
                code: err.code(),
                message,
                details: err.details().map(<[FieldError]>::to_vec),
            },
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Internal(detail) = &self {
            tracing::error!(%detail, "internal error");
        }
        (self.status(), Json(ErrorEnvelope::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn validation_envelope_carries_details() {
        let err = ServiceError::invalid("reason", "is required to reject a work");
        let body = serde_json::to_value(ErrorEnvelope::from(&err)).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "reason is required to reject a work",
                    "details": [{"field": "reason", "message": "is required to reject a work"}],
                }
            })
        );
    }

    #[test]
    fn internal_messages_are_masked() {
        let err = ServiceError::Internal("no such table: oeuvres".into());
        let body = serde_json::to_value(ErrorEnvelope::from(&err)).unwrap();
        assert_eq!(body["error"]["message"], "An internal error occurred");
        assert!(body["error"].get("details").is_none());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn conflict_maps_to_409() {
        let response = ServiceError::Conflict("cannot submit a work in status pending".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
