//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError`: Error response carrying HTTP status and codes
//! - `error_codes`: Standard error code constants

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::account::AccountError;
use crate::transfer::TransferError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
/// - error: stable string code, errors only
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
            error: None,
        }
    }

    /// Create error response
    pub fn error(code: i32, error: &'static str, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
            error: Some(error),
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 + success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 + success envelope
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

// ============================================================================
// ApiError
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub error: &'static str,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, error: &'static str, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            error,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            "INVALID_PARAMETER",
            msg,
        )
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::error(self.code, self.error, self.msg));
        (self.status, body).into_response()
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        let code = match &e {
            TransferError::InvalidAmount => error_codes::INVALID_AMOUNT,
            TransferError::SameAccount => error_codes::SAME_ACCOUNT,
            TransferError::UnsupportedCurrency(_) => error_codes::UNSUPPORTED_CURRENCY,
            TransferError::AccountNotFound(_) => error_codes::ACCOUNT_NOT_FOUND,
            TransferError::InsufficientBalance { .. } => error_codes::INSUFFICIENT_BALANCE,
            TransferError::BalanceOverflow { .. } => error_codes::BALANCE_OVERFLOW,
            TransferError::TransferNotFound(_) => error_codes::TRANSFER_NOT_FOUND,
            TransferError::LockAcquisition => error_codes::SERVICE_UNAVAILABLE,
            TransferError::PersistenceFailure(_) => error_codes::INTERNAL_ERROR,
        };
        // Store internals stay in the logs
        let msg = match &e {
            TransferError::PersistenceFailure(_) => "Transfer could not be persisted".to_string(),
            other => other.to_string(),
        };
        Self::new(status(e.http_status()), code, e.code(), msg)
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        let code = match &e {
            AccountError::NotFound(_) => error_codes::ACCOUNT_NOT_FOUND,
            AccountError::AlreadyExists(_) => error_codes::ACCOUNT_EXISTS,
            AccountError::NegativeBalance(_) | AccountError::TooPrecise(_) => {
                error_codes::INVALID_PARAMETER
            }
            AccountError::Store(_) => error_codes::INTERNAL_ERROR,
        };
        let msg = match &e {
            AccountError::Store(_) => "Account store unavailable".to_string(),
            other => other.to_string(),
        };
        Self::new(status(e.http_status()), code, e.code(), msg)
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const INVALID_AMOUNT: i32 = 1003;
    pub const SAME_ACCOUNT: i32 = 1004;
    pub const UNSUPPORTED_CURRENCY: i32 = 1005;
    pub const BALANCE_OVERFLOW: i32 = 1006;

    // Resource errors (4xxx)
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;
    pub const TRANSFER_NOT_FOUND: i32 = 4002;
    pub const ACCOUNT_EXISTS: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;
    use crate::store::StoreError;
    use rust_decimal::Decimal;

    #[test]
    fn test_success_envelope() {
        let v = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(v["code"], 0);
        assert_eq!(v["msg"], "ok");
        assert_eq!(v["data"], 42);
        assert!(v.get("error").is_none());
    }

    #[test]
    fn test_error_envelope_has_no_data() {
        let v = serde_json::to_value(ApiResponse::<()>::error(1001, "INVALID_PARAMETER", "bad"))
            .unwrap();
        assert_eq!(v["code"], 1001);
        assert_eq!(v["error"], "INVALID_PARAMETER");
        assert!(v.get("data").is_none());
    }

    #[test]
    fn test_transfer_error_mapping() {
        let e: ApiError = TransferError::InsufficientBalance {
            balance: Decimal::new(100, 0),
            amount: Decimal::new(200, 0),
            account_id: AccountId::new("a").unwrap(),
        }
        .into();
        assert_eq!(e.status, StatusCode::CONFLICT);
        assert_eq!(e.code, error_codes::INSUFFICIENT_BALANCE);
        assert_eq!(e.error, "INSUFFICIENT_BALANCE");

        let e: ApiError = TransferError::BalanceOverflow {
            account_id: AccountId::new("whale").unwrap(),
        }
        .into();
        assert_eq!(e.status, StatusCode::CONFLICT);
        assert_eq!(e.code, error_codes::BALANCE_OVERFLOW);
        assert_eq!(e.error, "BALANCE_OVERFLOW");

        let e: ApiError = TransferError::LockAcquisition.into();
        assert_eq!(e.status, StatusCode::SERVICE_UNAVAILABLE);

        let e: ApiError =
            TransferError::PersistenceFailure(StoreError::InvalidState("disk".into())).into();
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!e.msg.contains("disk"));
    }

    #[test]
    fn test_service_unavailable_response() {
        let resp = ApiError::service_unavailable("unavailable").into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let e = ApiError::service_unavailable("unavailable");
        assert_eq!(e.code, error_codes::SERVICE_UNAVAILABLE);
        assert_eq!(e.error, "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_account_error_mapping() {
        let e: ApiError = AccountError::NotFound(AccountId::new("x").unwrap()).into();
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.error, "ACCOUNT_NOT_FOUND");
    }
}
