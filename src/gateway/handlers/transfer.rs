//! Transfer handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, CreateTransferRequest, created, ok};
use crate::transfer::{TransferId, TransferRecord};

/// Create a transfer
///
/// POST /transactions
///
/// 201 with the committed record. Business rejections come back with the
/// status from `TransferError::http_status`.
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateTransferRequest>, JsonRejection>,
) -> ApiResult<TransferRecord> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let cmd = req.into_command()?;

    tracing::debug!(
        source = %cmd.source,
        target = %cmd.target,
        amount = %cmd.amount,
        currency = %cmd.currency,
        "Transfer request"
    );

    let record = state.orchestrator.transfer(cmd).await?;
    created(record)
}

/// GET /transactions
pub async fn list_transfers(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TransferRecord>> {
    ok(state.orchestrator.transfers().await?)
}

/// GET /transactions/{id}
pub async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TransferRecord> {
    let id = parse_transfer_id(&id)?;
    ok(state.orchestrator.load_transfer(&id).await?)
}

/// DELETE /transactions/{id}
///
/// Removes the ledger entry only; balances stay as they are.
pub async fn delete_transfer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    let id = parse_transfer_id(&id)?;
    state.orchestrator.clean(&id).await?;
    ok(id.to_string())
}

fn parse_transfer_id(raw: &str) -> Result<TransferId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid transaction ID format"))
}
