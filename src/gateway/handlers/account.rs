//! Account handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, CreateAccountRequest, created, ok};
use super::super::types::request::parse_account_id;
use crate::account::Account;

/// Open an account
///
/// POST /accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<Account> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let account = state.accounts.open(req.into_new_account()?).await?;
    created(account)
}

/// GET /accounts
pub async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Account>> {
    ok(state.accounts.accounts().await?)
}

/// GET /accounts/{id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Account> {
    let id = parse_account_id("id", id)?;
    ok(state.accounts.load_account(&id).await?)
}

/// DELETE /accounts/{id}
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    let id = parse_account_id("id", id)?;
    state.accounts.close(&id).await?;
    ok(id.into())
}
