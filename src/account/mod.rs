//! Account management module
//!
//! Account model, validated identifiers and the account service. Storage is
//! behind [`crate::store::LedgerStore`].

pub mod models;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use models::{Account, Currency, MONEY_SCALE, NewAccount, fits_money_scale};
pub use service::{AccountError, AccountService};
pub use validation::{AccountId, ValidationError};
