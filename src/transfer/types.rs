//! Transfer Core Types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::{AccountId, Currency};

/// Transfer ID type - ULID-based unique identifier
///
/// Monotonic and sortable, generated without coordination at acceptance time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferId(ulid::Ulid);

impl TransferId {
    /// Generate a new unique TransferId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransferId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

impl Serialize for TransferId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TransferId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Request to move `amount` from `source` to `target`.
///
/// `currency` is the raw code from the caller; the orchestrator validates it
/// after the amount and account checks.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferCommand {
    pub source: AccountId,
    pub target: AccountId,
    pub amount: Decimal,
    pub currency: String,
}

impl TransferCommand {
    pub fn new(
        source: AccountId,
        target: AccountId,
        amount: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target,
            amount,
            currency: currency.into(),
        }
    }
}

/// Ledger entry for a committed transfer. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: TransferId,
    pub source_account_id: AccountId,
    pub target_account_id: AccountId,
    pub amount: Decimal,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}
