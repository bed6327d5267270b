//! Account-to-account transfers
//!
//! # Flow
//!
//! ```text
//! validate (amount → same account → currency)
//!     → lock source + target in canonical order
//!     → batch fetch both accounts
//!     → balance check
//!     → store.apply_transfer (two balance updates + ledger insert, atomic)
//!     → release locks
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Conservation**: a committed transfer never changes the sum of the two balances
//! 2. **No Overdraft**: balances never go below zero
//! 3. **All-or-Nothing**: on any error both balances are untouched and no record exists
//! 4. **No Deadlock**: locks are always taken in `AccountId` order

pub mod error;
pub mod orchestrator;
pub mod types;


// Re-exports for convenience
pub use error::TransferError;
pub use orchestrator::TransferOrchestrator;
pub use types::{TransferCommand, TransferId, TransferRecord};
