//! Transfer Handler
//!
//! Credits the destination account. No source account is debited.

use std::sync::Arc;

use crate::domain::Transfer;
use crate::error::AppError;
use crate::store::AccountDirectory;

use super::{TransferCommand, TransferResult};

/// Handler for transfers
pub struct TransferHandler {
    directory: Arc<dyn AccountDirectory>,
}

impl TransferHandler {
    pub fn new(directory: Arc<dyn AccountDirectory>) -> Self {
        Self { directory }
    }

    /// Execute the transfer command
    pub async fn execute(&self, command: TransferCommand) -> Result<TransferResult, AppError> {
        let transfer = Transfer::new(command.to_account, command.amount)?;

        let account = self
            .directory
            .credit_balance(transfer.to_account, transfer.amount)
            .await?;

        tracing::info!(
            to_account = transfer.to_account,
            amount = transfer.amount,
            balance = account.balance,
            "Transfer credited"
        );

        Ok(TransferResult {
            balance: account.balance,
        })
    }
}
