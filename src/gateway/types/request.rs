//! Request bodies

use axum::http::StatusCode;
use serde::Deserialize;

use super::money::StrictDecimal;
use super::response::{ApiError, error_codes};
use crate::account::{AccountId, Currency, NewAccount};
use crate::transfer::TransferCommand;

/// POST /transactions
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    pub source_account_id: String,
    pub target_account_id: String,
    pub amount: StrictDecimal,
    pub currency: String,
}

impl CreateTransferRequest {
    /// Check id syntax only; amount and currency rules belong to the
    /// orchestrator.
    pub fn into_command(self) -> Result<TransferCommand, ApiError> {
        let source = parse_account_id("source_account_id", self.source_account_id)?;
        let target = parse_account_id("target_account_id", self.target_account_id)?;
        Ok(TransferCommand::new(
            source,
            target,
            self.amount.inner(),
            self.currency,
        ))
    }
}

/// POST /accounts
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub balance: StrictDecimal,
    pub currency: String,
}

impl CreateAccountRequest {
    pub fn into_new_account(self) -> Result<NewAccount, ApiError> {
        let id = self
            .id
            .map(|raw| parse_account_id("id", raw))
            .transpose()?;
        let currency: Currency = self.currency.parse().map_err(|e| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                error_codes::UNSUPPORTED_CURRENCY,
                "UNSUPPORTED_CURRENCY",
                format!("{}", e),
            )
        })?;
        Ok(NewAccount {
            id,
            balance: self.balance.inner(),
            currency,
        })
    }
}

pub(crate) fn parse_account_id(field: &str, raw: String) -> Result<AccountId, ApiError> {
    AccountId::new(raw).map_err(|e| ApiError::bad_request(format!("{}: {}", field, e)))
}
