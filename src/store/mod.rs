//! Ledger store
//!
//! [`LedgerStore`] is the narrow capability the orchestrator depends on:
//! fetch, batch fetch, atomic apply, delete. Backends are swappable:
//!
//! - [`MemoryStore`] - in-process maps behind one async RwLock
//! - [`PgStore`] - PostgreSQL via sqlx, optional cross-process advisory lock

pub mod memory;
pub mod postgres;
pub mod schema;

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::{Account, AccountId, NewAccount};
use crate::transfer::{TransferId, TransferRecord};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Transfer not found: {0}")]
    TransferNotFound(TransferId),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid stored data: {0}")]
    InvalidState(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The writes of one transfer: two balance updates plus the ledger entry.
///
/// A store must commit all of them or none. The `*_prior` balances are the
/// values the new balances were computed from; if either account no longer
/// holds its prior balance the store rejects the apply with `Conflict`.
#[derive(Debug, Clone)]
pub struct AtomicTransfer {
    pub record: TransferRecord,
    pub source_prior: Decimal,
    pub source_balance: Decimal,
    pub target_prior: Decimal,
    pub target_balance: Decimal,
}

/// Durable account and ledger state.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Insert a new account. Fails with `Conflict` if the id is taken.
    async fn create_account(&self, account: NewAccount) -> StoreResult<Account>;

    async fn find_account(&self, id: &AccountId) -> StoreResult<Option<Account>>;

    /// Fetch several accounts in one call. Missing ids are simply absent.
    async fn find_accounts_by_ids(
        &self,
        ids: &[AccountId],
    ) -> StoreResult<HashMap<AccountId, Account>>;

    async fn list_accounts(&self) -> StoreResult<Vec<Account>>;

    async fn delete_account(&self, id: &AccountId) -> StoreResult<()>;

    /// Apply both balance updates and insert the record, all-or-nothing.
    ///
    /// Fails with `Conflict` when a balance moved since it was read. On error
    /// nothing has been written.
    async fn apply_transfer(&self, transfer: AtomicTransfer) -> StoreResult<TransferRecord>;

    async fn find_transfer(&self, id: &TransferId) -> StoreResult<Option<TransferRecord>>;

    async fn list_transfers(&self) -> StoreResult<Vec<TransferRecord>>;

    async fn delete_transfer(&self, id: &TransferId) -> StoreResult<()>;

    /// Liveness probe
    async fn ping(&self) -> StoreResult<()>;
}
