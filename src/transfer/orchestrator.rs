//! Transfer Orchestrator
//!
//! Validates a [`TransferCommand`], serialises it against every other
//! transfer touching the same accounts, and hands the resulting writes to the
//! store as one atomic unit.
//!
//! Both account locks are taken in canonical (`AccountId` ordering) order and
//! held across fetch, balance check and apply, so opposite-direction
//! transfers on one pair cannot deadlock and no transfer reads a balance that
//! another is about to overwrite.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::error::TransferError;
use super::types::{TransferCommand, TransferId, TransferRecord};
use crate::account::{AccountId, Currency, fits_money_scale};
use crate::keyed_lock::{KeyGuards, KeyedLockManager};
use crate::store::{AtomicTransfer, LedgerStore};

/// Transfer Orchestrator - the single write path for balances
pub struct TransferOrchestrator {
    store: Arc<dyn LedgerStore>,
    locks: KeyedLockManager<AccountId>,
    lock_timeout: Option<Duration>,
}

impl TransferOrchestrator {
    pub fn new(store: Arc<dyn LedgerStore>, locks: KeyedLockManager<AccountId>) -> Self {
        Self {
            store,
            locks,
            lock_timeout: None,
        }
    }

    /// Bound the wait for account locks. Without it a transfer waits as long
    /// as the current holders take.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    pub fn locks(&self) -> &KeyedLockManager<AccountId> {
        &self.locks
    }

    /// Move `cmd.amount` from source to target.
    ///
    /// # Errors
    /// Validation runs first, in order: `InvalidAmount`, `SameAccount`,
    /// `UnsupportedCurrency`. After locking: `AccountNotFound` (source
    /// checked first), `InsufficientBalance`, `BalanceOverflow`, then
    /// `PersistenceFailure` if the store rejects the apply. Nothing is
    /// written on any error.
    pub async fn transfer(&self, cmd: TransferCommand) -> Result<TransferRecord, TransferError> {
        if cmd.amount <= Decimal::ZERO || !fits_money_scale(&cmd.amount) {
            return Err(TransferError::InvalidAmount);
        }
        if cmd.source == cmd.target {
            return Err(TransferError::SameAccount);
        }
        let currency: Currency = cmd
            .currency
            .parse()
            .map_err(|_| TransferError::UnsupportedCurrency(cmd.currency.clone()))?;

        let guards = self.lock_pair(&cmd).await?;
        let result = self.execute(&cmd, currency).await;
        guards.release();

        match &result {
            Ok(record) => info!(
                transfer_id = %record.id,
                source = %cmd.source,
                target = %cmd.target,
                amount = %cmd.amount,
                currency = %currency,
                "Transfer committed"
            ),
            Err(TransferError::PersistenceFailure(e)) => error!(
                source = %cmd.source,
                target = %cmd.target,
                amount = %cmd.amount,
                error = %e,
                "Transfer apply failed, rolled back"
            ),
            Err(e) => warn!(
                source = %cmd.source,
                target = %cmd.target,
                amount = %cmd.amount,
                code = e.code(),
                "Transfer rejected: {}",
                e
            ),
        }
        result
    }

    async fn lock_pair(&self, cmd: &TransferCommand) -> Result<KeyGuards<AccountId>, TransferError> {
        let acquire = self
            .locks
            .acquire_exclusive_many([cmd.source.clone(), cmd.target.clone()]);

        match self.lock_timeout {
            // A timed-out acquire drops its pending guards, returning their
            // lease references.
            Some(limit) => tokio::time::timeout(limit, acquire).await.map_err(|_| {
                warn!(
                    source = %cmd.source,
                    target = %cmd.target,
                    timeout_ms = limit.as_millis() as u64,
                    "Account lock wait timed out"
                );
                TransferError::LockAcquisition
            }),
            None => Ok(acquire.await),
        }
    }

    /// Fetch, check and apply. Caller holds both account locks.
    async fn execute(
        &self,
        cmd: &TransferCommand,
        currency: Currency,
    ) -> Result<TransferRecord, TransferError> {
        let ids = [cmd.source.clone(), cmd.target.clone()];
        let mut accounts = self
            .store
            .find_accounts_by_ids(&ids)
            .await
            .map_err(TransferError::PersistenceFailure)?;

        let source = accounts
            .remove(&cmd.source)
            .ok_or_else(|| TransferError::AccountNotFound(cmd.source.clone()))?;
        let target = accounts
            .remove(&cmd.target)
            .ok_or_else(|| TransferError::AccountNotFound(cmd.target.clone()))?;

        if source.balance < cmd.amount {
            return Err(TransferError::InsufficientBalance {
                balance: source.balance,
                amount: cmd.amount,
                account_id: source.id,
            });
        }

        let source_balance = source.balance.checked_sub(cmd.amount).ok_or_else(|| {
            TransferError::BalanceOverflow {
                account_id: source.id.clone(),
            }
        })?;
        let target_balance = target.balance.checked_add(cmd.amount).ok_or_else(|| {
            TransferError::BalanceOverflow {
                account_id: target.id.clone(),
            }
        })?;

        let record = TransferRecord {
            id: TransferId::new(),
            source_account_id: source.id,
            target_account_id: target.id,
            amount: cmd.amount,
            currency,
            created_at: Utc::now(),
        };
        debug!(transfer_id = %record.id, "Applying transfer");

        let apply = AtomicTransfer {
            record,
            source_prior: source.balance,
            source_balance,
            target_prior: target.balance,
            target_balance,
        };
        self.store
            .apply_transfer(apply)
            .await
            .map_err(TransferError::PersistenceFailure)
    }

    /// Look up a committed transfer.
    pub async fn load_transfer(&self, id: &TransferId) -> Result<TransferRecord, TransferError> {
        self.store
            .find_transfer(id)
            .await?
            .ok_or_else(|| TransferError::TransferNotFound(id.to_string()))
    }

    pub async fn transfers(&self) -> Result<Vec<TransferRecord>, TransferError> {
        Ok(self.store.list_transfers().await?)
    }

    /// Administrative removal of a ledger entry. Balances are not touched.
    pub async fn clean(&self, id: &TransferId) -> Result<(), TransferError> {
        self.store.delete_transfer(id).await?;
        info!(transfer_id = %id, "Transfer record deleted");
        Ok(())
    }

    /// Whether the backing store answers.
    pub async fn alive(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Store ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::NewAccount;
    use crate::store::MemoryStore;

    fn acc(id: &str) -> AccountId {
        AccountId::new(id).unwrap()
    }

    async fn setup(accounts: &[(&str, i64)]) -> (Arc<MemoryStore>, TransferOrchestrator) {
        let store = Arc::new(MemoryStore::new());
        for (id, balance) in accounts {
            store
                .create_account(NewAccount::new(
                    acc(id),
                    Decimal::new(*balance, 0),
                    Currency::EUR,
                ))
                .await
                .unwrap();
        }
        let orch = TransferOrchestrator::new(store.clone(), KeyedLockManager::new());
        (store, orch)
    }

    #[tokio::test]
    async fn test_validation_order() {
        let (_, orch) = setup(&[]).await;

        // Zero amount wins over same-account and bad currency
        let err = orch
            .transfer(TransferCommand::new(acc("a"), acc("a"), Decimal::ZERO, "XXX"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::InvalidAmount));

        let err = orch
            .transfer(TransferCommand::new(acc("a"), acc("a"), Decimal::ONE, "XXX"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::SameAccount));

        let err = orch
            .transfer(TransferCommand::new(acc("a"), acc("b"), Decimal::ONE, "XXX"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::UnsupportedCurrency(ref c) if c == "XXX"));
    }

    #[tokio::test]
    async fn test_negative_amount() {
        let (_, orch) = setup(&[("a", 10), ("b", 10)]).await;
        let err = orch
            .transfer(TransferCommand::new(acc("a"), acc("b"), Decimal::new(-5, 0), "EUR"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::InvalidAmount));
    }

    #[tokio::test]
    async fn test_amount_finer_than_ledger_scale() {
        let (store, orch) = setup(&[("a", 10), ("b", 0)]).await;
        let err = orch
            .transfer(TransferCommand::new(acc("a"), acc("b"), Decimal::new(15, 9), "EUR"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::InvalidAmount));
        assert!(store.list_transfers().await.unwrap().is_empty());

        // 8 places is the limit, trailing zeros past it are harmless
        orch.transfer(TransferCommand::new(acc("a"), acc("b"), Decimal::new(1, 8), "EUR"))
            .await
            .unwrap();
        orch.transfer(TransferCommand::new(acc("a"), acc("b"), Decimal::new(1_000, 11), "EUR"))
            .await
            .unwrap();
        let b = store.find_account(&acc("b")).await.unwrap().unwrap();
        assert_eq!(b.balance, Decimal::new(2, 8));
    }

    #[tokio::test]
    async fn test_target_overflow_is_rejected_without_writes() {
        let (store, orch) = setup(&[("a", 10)]).await;
        store
            .create_account(NewAccount::new(acc("whale"), Decimal::MAX, Currency::EUR))
            .await
            .unwrap();

        let err = orch
            .transfer(TransferCommand::new(acc("a"), acc("whale"), Decimal::ONE, "EUR"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, TransferError::BalanceOverflow { ref account_id } if account_id.as_str() == "whale")
        );

        let a = store.find_account(&acc("a")).await.unwrap().unwrap();
        let whale = store.find_account(&acc("whale")).await.unwrap().unwrap();
        assert_eq!(a.balance, Decimal::new(10, 0));
        assert_eq!(whale.balance, Decimal::MAX);
        assert!(store.list_transfers().await.unwrap().is_empty());
        assert_eq!(orch.locks().active_keys(), 0);
    }

    #[tokio::test]
    async fn test_missing_source_named_first() {
        let (_, orch) = setup(&[]).await;
        let err = orch
            .transfer(TransferCommand::new(acc("src"), acc("dst"), Decimal::ONE, "EUR"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::AccountNotFound(ref id) if id.as_str() == "src"));
    }

    #[tokio::test]
    async fn test_currency_case_insensitive() {
        let (store, orch) = setup(&[("a", 10), ("b", 0)]).await;
        let record = orch
            .transfer(TransferCommand::new(acc("a"), acc("b"), Decimal::new(3, 0), "eur"))
            .await
            .unwrap();
        assert_eq!(record.currency, Currency::EUR);
        let b = store.find_account(&acc("b")).await.unwrap().unwrap();
        assert_eq!(b.balance, Decimal::new(3, 0));
    }

    #[tokio::test]
    async fn test_exact_balance_drains_to_zero() {
        let (store, orch) = setup(&[("a", 10), ("b", 0)]).await;
        orch.transfer(TransferCommand::new(acc("a"), acc("b"), Decimal::new(10, 0), "EUR"))
            .await
            .unwrap();
        let a = store.find_account(&acc("a")).await.unwrap().unwrap();
        assert_eq!(a.balance, Decimal::ZERO);
        assert_eq!(orch.locks().active_keys(), 0);
    }

    #[tokio::test]
    async fn test_read_side() {
        let (_, orch) = setup(&[("a", 10), ("b", 0)]).await;
        let record = orch
            .transfer(TransferCommand::new(acc("a"), acc("b"), Decimal::ONE, "USD"))
            .await
            .unwrap();

        assert_eq!(orch.load_transfer(&record.id).await.unwrap(), record);
        assert_eq!(orch.transfers().await.unwrap().len(), 1);
        assert!(orch.alive().await);

        orch.clean(&record.id).await.unwrap();
        let err = orch.load_transfer(&record.id).await.unwrap_err();
        assert!(matches!(err, TransferError::TransferNotFound(_)));
        assert!(matches!(
            orch.clean(&record.id).await,
            Err(TransferError::TransferNotFound(_))
        ));
    }
}
