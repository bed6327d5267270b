//! HTTP handlers, one file per resource

pub mod account;
pub mod health;
pub mod transfer;

pub use account::{create_account, delete_account, get_account, list_accounts};
pub use health::health_check;
pub use transfer::{create_transfer, delete_transfer, get_transfer, list_transfers};
