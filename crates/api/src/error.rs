//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": CODE, "message": ..., "details"?: {...}}`
//! with the status the domain error reports.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::{Value, json};
use tracing::error;

use vertice_core::balance::BalanceError;
use vertice_core::distribution::DistributionError;
use vertice_core::investment::InvestmentError;
use vertice_core::ledger::LedgerError;
use vertice_core::pix::PixError;
use vertice_core::withdrawal::WithdrawalError;
use vertice_db::repositories::NotificationError;
use vertice_shared::AppError;

/// An error rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// 400 for a single invalid field.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
            .with_details(json!({ "field": field }))
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn from_parts(status: u16, code: &'static str, message: String) -> Self {
        Self::new(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "request failed");
            match self.code {
                "DATABASE_ERROR" | "INTERNAL_ERROR" => "An error occurred".to_string(),
                _ => self.message,
            }
        } else {
            self.message
        };

        let mut body = json!({ "error": self.code, "message": message });
        if let (Some(details), Some(map)) = (self.details, body.as_object_mut()) {
            map.insert("details".to_string(), details);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::from_parts(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<WithdrawalError> for ApiError {
    fn from(e: WithdrawalError) -> Self {
        let details = match &e {
            WithdrawalError::Validation { field, .. } => Some(json!({ "field": field })),
            WithdrawalError::InsufficientFunds {
                kind,
                requested_cents,
                available_cents,
            } => Some(json!({
                "withdrawal_type": kind,
                "requested_cents": requested_cents,
                "available_cents": available_cents,
            })),
            WithdrawalError::InvalidTransition { from, to } => {
                Some(json!({ "from": from, "to": to }))
            }
            _ => None,
        };
        let err = Self::from_parts(e.status_code(), e.error_code(), e.to_string());
        match details {
            Some(details) => err.with_details(details),
            None => err,
        }
    }
}

impl From<InvestmentError> for ApiError {
    fn from(e: InvestmentError) -> Self {
        let details = match &e {
            InvestmentError::Validation { field, .. } => Some(json!({ "field": field })),
            InvestmentError::InvalidTransition { from, to } => {
                Some(json!({ "from": from, "to": to }))
            }
            _ => None,
        };
        let err = Self::from_parts(e.status_code(), e.error_code(), e.to_string());
        match details {
            Some(details) => err.with_details(details),
            None => err,
        }
    }
}

impl From<DistributionError> for ApiError {
    fn from(e: DistributionError) -> Self {
        let err = Self::from_parts(e.status_code(), e.error_code(), e.to_string());
        match &e {
            DistributionError::Validation { field, .. } => {
                err.with_details(json!({ "field": field }))
            }
            _ => err,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        let err = Self::from_parts(e.status_code(), e.error_code(), e.to_string());
        match &e {
            LedgerError::Validation { field, .. } => err.with_details(json!({ "field": field })),
            _ => err,
        }
    }
}

impl From<PixError> for ApiError {
    fn from(e: PixError) -> Self {
        Self::from_parts(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<BalanceError> for ApiError {
    fn from(e: BalanceError) -> Self {
        Self::from_parts(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<NotificationError> for ApiError {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::NotFound(id) => {
                AppError::NotFound {
                    resource: "notification",
                    id,
                }
                .into()
            }
            NotificationError::Database(db) => db.into(),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
            e.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vertice_core::withdrawal::{WithdrawalStatus, WithdrawalType};

    #[test]
    fn test_insufficient_funds_carries_available_amount() {
        let err: ApiError = WithdrawalError::InsufficientFunds {
            kind: WithdrawalType::ResultSettlement,
            requested_cents: 1_001,
            available_cents: 1_000,
        }
        .into();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "INSUFFICIENT_FUNDS");
        let details = err.details.unwrap();
        assert_eq!(details["available_cents"], 1_000);
        assert_eq!(details["withdrawal_type"], "RESULT_SETTLEMENT");
    }

    #[test]
    fn test_invalid_transition_maps_to_conflict() {
        let err: ApiError = WithdrawalError::InvalidTransition {
            from: WithdrawalStatus::Paid,
            to: WithdrawalStatus::Rejected,
        }
        .into();

        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_validation_names_the_field() {
        let err: ApiError = LedgerError::Validation {
            field: "description",
            message: "description is required".to_string(),
        }
        .into();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.details.unwrap()["field"], "description");
    }

    #[test]
    fn test_not_found_variants() {
        let err: ApiError = InvestmentError::NotFound(Uuid::nil()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = NotificationError::NotFound(Uuid::nil()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_missing_pix_key_is_server_error() {
        let err: ApiError = PixError::MissingKey.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "PIX_NOT_CONFIGURED");
    }

    #[test]
    fn test_database_error_message_is_masked() {
        let err: ApiError = DbErr::Custom("connection refused".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
