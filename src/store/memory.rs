//! In-memory ledger store

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::{AtomicTransfer, LedgerStore, StoreError, StoreResult};
use crate::account::{Account, AccountId, NewAccount};
use crate::transfer::{TransferId, TransferRecord};

#[derive(Default)]
struct Ledger {
    accounts: HashMap<AccountId, Account>,
    /// Keyed by ULID, so iteration is creation order.
    transfers: BTreeMap<TransferId, TransferRecord>,
}

/// Account and transfer maps behind a single async RwLock.
///
/// Every write happens inside one write-lock section, which is what makes
/// `apply_transfer` atomic to readers.
#[derive(Default)]
pub struct MemoryStore {
    ledger: RwLock<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all balances, ignoring currency.
    pub async fn total_balance(&self) -> Decimal {
        self.ledger
            .read()
            .await
            .accounts
            .values()
            .map(|a| a.balance)
            .sum()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        let id = account.id.unwrap_or_else(AccountId::generate);
        let mut ledger = self.ledger.write().await;

        if ledger.accounts.contains_key(&id) {
            return Err(StoreError::Conflict(format!("account {} already exists", id)));
        }

        let created = Account {
            id: id.clone(),
            balance: account.balance,
            currency: account.currency,
            created_at: Utc::now(),
        };
        ledger.accounts.insert(id, created.clone());
        Ok(created)
    }

    async fn find_account(&self, id: &AccountId) -> StoreResult<Option<Account>> {
        Ok(self.ledger.read().await.accounts.get(id).cloned())
    }

    async fn find_accounts_by_ids(
        &self,
        ids: &[AccountId],
    ) -> StoreResult<HashMap<AccountId, Account>> {
        let ledger = self.ledger.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| ledger.accounts.get(id).map(|a| (id.clone(), a.clone())))
            .collect())
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let mut accounts: Vec<Account> =
            self.ledger.read().await.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(accounts)
    }

    async fn delete_account(&self, id: &AccountId) -> StoreResult<()> {
        match self.ledger.write().await.accounts.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::AccountNotFound(id.clone())),
        }
    }

    async fn apply_transfer(&self, transfer: AtomicTransfer) -> StoreResult<TransferRecord> {
        let AtomicTransfer {
            record,
            source_prior,
            source_balance,
            target_prior,
            target_balance,
        } = transfer;

        let mut ledger = self.ledger.write().await;

        // All checks first: nothing below may fail once a write has happened.
        let sides = [
            (&record.source_account_id, source_prior),
            (&record.target_account_id, target_prior),
        ];
        for (id, _) in &sides {
            if !ledger.accounts.contains_key(*id) {
                return Err(StoreError::AccountNotFound((*id).clone()));
            }
        }
        if source_balance.is_sign_negative() || target_balance.is_sign_negative() {
            return Err(StoreError::InvalidState(format!(
                "negative balance in transfer {}",
                record.id
            )));
        }
        if ledger.transfers.contains_key(&record.id) {
            return Err(StoreError::Conflict(format!(
                "transfer {} already exists",
                record.id
            )));
        }
        for (id, prior) in &sides {
            let current = ledger.accounts.get(*id).map(|a| a.balance);
            if current != Some(*prior) {
                return Err(StoreError::Conflict(format!(
                    "balance of account {} changed since it was read",
                    id
                )));
            }
        }

        if let Some(source) = ledger.accounts.get_mut(&record.source_account_id) {
            source.balance = source_balance;
        }
        if let Some(target) = ledger.accounts.get_mut(&record.target_account_id) {
            target.balance = target_balance;
        }
        ledger.transfers.insert(record.id, record.clone());

        Ok(record)
    }

    async fn find_transfer(&self, id: &TransferId) -> StoreResult<Option<TransferRecord>> {
        Ok(self.ledger.read().await.transfers.get(id).cloned())
    }

    async fn list_transfers(&self) -> StoreResult<Vec<TransferRecord>> {
        Ok(self.ledger.read().await.transfers.values().cloned().collect())
    }

    async fn delete_transfer(&self, id: &TransferId) -> StoreResult<()> {
        match self.ledger.write().await.transfers.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::TransferNotFound(*id)),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
