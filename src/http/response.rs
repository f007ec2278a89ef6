//! Error to HTTP response mapping.
//!
//! # Status Codes
//! - InvalidAddress → 400
//! - NotFound → 404
//! - Throttled → 429 with `Retry-After`
//! - SubmissionFailed, OperationFailed, Backend → 502
//! - Overloaded → 503
//! - OperationTimedOut → 504
//! - Internal → 500

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::faucet::FaucetError;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_not_before: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

/// Wrapper giving [`FaucetError`] an HTTP representation.
#[derive(Debug)]
pub struct ApiError(pub FaucetError);

impl From<FaucetError> for ApiError {
    fn from(err: FaucetError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            FaucetError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            FaucetError::NotFound(_) => StatusCode::NOT_FOUND,
            FaucetError::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
            FaucetError::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            FaucetError::SubmissionFailed(_)
            | FaucetError::OperationFailed { .. }
            | FaucetError::Backend(_) => StatusCode::BAD_GATEWAY,
            FaucetError::OperationTimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
            FaucetError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (retry_not_before, operation_id) = match &self.0 {
            FaucetError::Throttled { retry_not_before, .. } => (Some(*retry_not_before), None),
            FaucetError::OperationFailed { operation_id, .. }
            | FaucetError::OperationTimedOut { operation_id } => (None, Some(operation_id.clone())),
            _ => (None, None),
        };

        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.outcome(),
            retry_not_before,
            operation_id,
        };

        let mut response = (status, Json(body)).into_response();
        if let FaucetError::Throttled { retry_after_secs, .. } = &self.0 {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faucet::AddressRejection;
    use crate::rpc::RpcError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (FaucetError::InvalidAddress(AddressRejection::Empty), StatusCode::BAD_REQUEST),
            (FaucetError::NotFound("op".into()), StatusCode::NOT_FOUND),
            (FaucetError::Overloaded, StatusCode::SERVICE_UNAVAILABLE),
            (FaucetError::SubmissionFailed(RpcError::Timeout(1)), StatusCode::BAD_GATEWAY),
            (
                FaucetError::OperationTimedOut { operation_id: "op".into() },
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[test]
    fn test_throttled_sets_retry_after() {
        // Far in the past relative to the wall clock; the header must still
        // follow the value computed against the faucet clock.
        let err = ApiError(FaucetError::Throttled {
            retry_not_before: Utc::now() - chrono::Duration::days(365),
            retry_after_secs: 90,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "90");
    }
}
