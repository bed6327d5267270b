//! Transfer Error Types

use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountId;
use crate::store::StoreError;

/// Transfer error types
///
/// Every variant is returned to the caller as-is; the orchestrator never
/// retries. Only `PersistenceFailure` is safe to retry, since the store has
/// rolled everything back.
#[derive(Error, Debug)]
pub enum TransferError {
    // === Validation Errors ===
    /// Zero, negative, or finer than the ledger's fractional precision
    #[error("Amount must be greater than zero with at most 8 decimal places")]
    InvalidAmount,

    #[error("Source and target account cannot be the same")]
    SameAccount,

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    // === Account Errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient balance: {balance:.2} < {amount:.2} for account {account_id}")]
    InsufficientBalance {
        balance: Decimal,
        amount: Decimal,
        account_id: AccountId,
    },

    #[error("Balance of account {account_id} would overflow")]
    BalanceOverflow { account_id: AccountId },

    // === Lookup Errors ===
    #[error("Transfer not found: {0}")]
    TransferNotFound(String),

    // === System Errors ===
    #[error("Timed out waiting for account lock")]
    LockAcquisition,

    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[source] StoreError),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::SameAccount => "SAME_ACCOUNT",
            TransferError::UnsupportedCurrency(_) => "UNSUPPORTED_CURRENCY",
            TransferError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            TransferError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            TransferError::BalanceOverflow { .. } => "BALANCE_OVERFLOW",
            TransferError::TransferNotFound(_) => "TRANSFER_NOT_FOUND",
            TransferError::LockAcquisition => "LOCK_ACQUISITION_FAILED",
            TransferError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::InvalidAmount | TransferError::UnsupportedCurrency(_) => 400,
            TransferError::AccountNotFound(_) | TransferError::TransferNotFound(_) => 404,
            TransferError::SameAccount
            | TransferError::InsufficientBalance { .. }
            | TransferError::BalanceOverflow { .. } => 409,
            TransferError::LockAcquisition => 503,
            TransferError::PersistenceFailure(_) => 500,
        }
    }

    /// Whether the whole `transfer` call may be retried by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransferError::PersistenceFailure(_) | TransferError::LockAcquisition
        )
    }
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AccountNotFound(id) => TransferError::AccountNotFound(id),
            StoreError::TransferNotFound(id) => TransferError::TransferNotFound(id.to_string()),
            other => TransferError::PersistenceFailure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(id: &str) -> AccountId {
        AccountId::new(id).unwrap()
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(TransferError::SameAccount.code(), "SAME_ACCOUNT");
        assert_eq!(TransferError::InvalidAmount.code(), "INVALID_AMOUNT");
        assert_eq!(
            TransferError::AccountNotFound(acc("x")).code(),
            "ACCOUNT_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(TransferError::InvalidAmount.http_status(), 400);
        assert_eq!(
            TransferError::UnsupportedCurrency("GBP".into()).http_status(),
            400
        );
        assert_eq!(TransferError::SameAccount.http_status(), 409);
        assert_eq!(TransferError::AccountNotFound(acc("x")).http_status(), 404);
        assert_eq!(
            TransferError::PersistenceFailure(StoreError::Conflict("dup".into())).http_status(),
            500
        );
        assert_eq!(TransferError::LockAcquisition.http_status(), 503);
    }

    #[test]
    fn test_insufficient_balance_display() {
        let err = TransferError::InsufficientBalance {
            balance: Decimal::new(100, 0),
            amount: Decimal::new(200, 0),
            account_id: acc("acc-1"),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: 100.00 < 200.00 for account acc-1"
        );
        assert_eq!(err.http_status(), 409);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_balance_overflow_is_final() {
        let err = TransferError::BalanceOverflow {
            account_id: acc("whale"),
        };
        assert_eq!(err.code(), "BALANCE_OVERFLOW");
        assert_eq!(err.http_status(), 409);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_store_error_mapping() {
        let e: TransferError = StoreError::AccountNotFound(acc("ghost")).into();
        assert!(matches!(e, TransferError::AccountNotFound(ref id) if id.as_str() == "ghost"));

        let e: TransferError = StoreError::Conflict("boom".into()).into();
        assert!(matches!(e, TransferError::PersistenceFailure(_)));
        assert!(e.is_retryable());
    }
}
