//! Data models for ledger accounts

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::AccountId;

/// Supported currencies. No conversion happens between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
}

impl Currency {
    /// ISO 4217 code, also the storage representation.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fractional digits the ledger stores for balances and amounts.
pub const MONEY_SCALE: u32 = 8;

/// True when `value` needs no more than [`MONEY_SCALE`] fractional digits.
/// Trailing zeros do not count.
pub fn fits_money_scale(value: &Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}

/// Ledger account
///
/// Balances change only through a committed transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: Decimal,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

/// Request to open an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Generated when absent
    pub id: Option<AccountId>,
    pub balance: Decimal,
    pub currency: Currency,
}

impl NewAccount {
    pub fn new(id: AccountId, balance: Decimal, currency: Currency) -> Self {
        Self {
            id: Some(id),
            balance,
            currency,
        }
    }
}
