//! PostgreSQL schema for the ledger

use sqlx::PgPool;

/// Accounts; the CHECK keeps balances non-negative even if a caller bypasses
/// the orchestrator.
pub const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id          TEXT PRIMARY KEY,
    balance     NUMERIC(30, 8) NOT NULL CHECK (balance >= 0),
    currency    TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id                 TEXT PRIMARY KEY,
    source_account_id  TEXT NOT NULL,
    target_account_id  TEXT NOT NULL,
    amount             NUMERIC(30, 8) NOT NULL CHECK (amount > 0),
    currency           TEXT NOT NULL,
    created_at         TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_TRANSACTIONS_SOURCE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_transactions_source ON transactions (source_account_id)
"#;

pub const CREATE_TRANSACTIONS_TARGET_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_transactions_target ON transactions (target_account_id)
"#;

/// Create tables and indexes if missing. Safe to run on every start.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing ledger schema...");

    for ddl in [
        CREATE_ACCOUNTS_TABLE,
        CREATE_TRANSACTIONS_TABLE,
        CREATE_TRANSACTIONS_SOURCE_INDEX,
        CREATE_TRANSACTIONS_TARGET_INDEX,
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("Ledger schema ready");
    Ok(())
}
