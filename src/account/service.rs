//! Account service: lookups and plain account lifecycle.
//!
//! Balances are never written here; only the transfer orchestrator moves
//! funds.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use super::models::{Account, NewAccount, fits_money_scale};
use super::validation::AccountId;
use crate::store::{LedgerStore, StoreError};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    #[error("Opening balance cannot be negative: {0}")]
    NegativeBalance(Decimal),

    #[error("Opening balance has more than 8 decimal places: {0}")]
    TooPrecise(Decimal),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AccountError {
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::NotFound(_) => "ACCOUNT_NOT_FOUND",
            AccountError::AlreadyExists(_) => "ACCOUNT_EXISTS",
            AccountError::NegativeBalance(_) | AccountError::TooPrecise(_) => "INVALID_BALANCE",
            AccountError::Store(_) => "STORE_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            AccountError::NotFound(_) => 404,
            AccountError::AlreadyExists(_) => 409,
            AccountError::NegativeBalance(_) | AccountError::TooPrecise(_) => 400,
            AccountError::Store(_) => 500,
        }
    }
}

pub struct AccountService {
    store: Arc<dyn LedgerStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn open(&self, account: NewAccount) -> Result<Account, AccountError> {
        if account.balance.is_sign_negative() {
            return Err(AccountError::NegativeBalance(account.balance));
        }
        if !fits_money_scale(&account.balance) {
            return Err(AccountError::TooPrecise(account.balance));
        }

        let created = self.store.create_account(account).await.map_err(|e| match e {
            StoreError::Conflict(msg) => AccountError::AlreadyExists(msg),
            other => AccountError::Store(other),
        })?;

        info!(
            account_id = %created.id,
            balance = %created.balance,
            currency = %created.currency,
            "Account opened"
        );
        Ok(created)
    }

    /// Load one account; absent is an error.
    pub async fn load_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.store
            .find_account(id)
            .await?
            .ok_or_else(|| AccountError::NotFound(id.clone()))
    }

    /// Batch lookup; missing ids are simply absent from the result.
    pub async fn fetch_accounts_by_ids(
        &self,
        ids: &[AccountId],
    ) -> Result<HashMap<AccountId, Account>, AccountError> {
        Ok(self.store.find_accounts_by_ids(ids).await?)
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.store.list_accounts().await?)
    }

    /// Administrative delete.
    pub async fn close(&self, id: &AccountId) -> Result<(), AccountError> {
        self.store.delete_account(id).await.map_err(|e| match e {
            StoreError::AccountNotFound(id) => AccountError::NotFound(id),
            other => {
                warn!(account_id = %id, error = %other, "Account delete failed");
                AccountError::Store(other)
            }
        })?;
        info!(account_id = %id, "Account closed");
        Ok(())
    }
}
