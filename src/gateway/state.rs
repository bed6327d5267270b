use std::sync::Arc;

use crate::account::AccountService;
use crate::transfer::TransferOrchestrator;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    /// The only write path for balances
    pub orchestrator: Arc<TransferOrchestrator>,
    /// Account lookups and lifecycle
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(orchestrator: Arc<TransferOrchestrator>, accounts: Arc<AccountService>) -> Self {
        Self {
            orchestrator,
            accounts,
        }
    }
}
