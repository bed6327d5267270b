//! fundflow - concurrency-safe account-to-account transfers
//!
//! Moves money between ledger accounts so that concurrent transfers touching
//! the same account are serialised, transfers on disjoint accounts run in
//! parallel, and every transfer either fully commits or leaves no trace.
//!
//! # Modules
//!
//! - [`keyed_lock`] - On-demand per-key locks with lease recycling
//! - [`account`] - Account model, ids, currencies, account service
//! - [`transfer`] - Transfer command/record types and the orchestrator
//! - [`store`] - Ledger store capability + in-memory and PostgreSQL backends
//! - [`db`] - PostgreSQL connection pool
//! - [`gateway`] - HTTP transport (axum)
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod keyed_lock;

pub mod account;
pub mod store;
pub mod transfer;

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use account::{Account, AccountId, AccountService, Currency, NewAccount};
pub use keyed_lock::{KeyGuard, KeyGuards, KeyedLockManager};
pub use store::{AtomicTransfer, LedgerStore, MemoryStore, PgStore, StoreError};
pub use transfer::{TransferCommand, TransferError, TransferId, TransferOrchestrator, TransferRecord};
