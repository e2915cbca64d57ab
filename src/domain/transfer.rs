//! Transfer value object
//!
//! A transfer only credits its destination; nothing is debited.

use super::account::AccountId;

/// Validated credit of `amount` to `to_account`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub to_account: AccountId,
    pub amount: i64,
}

/// Reasons a transfer request is refused before touching the store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("invalid destination account id: {0}")]
    InvalidDestination(AccountId),

    #[error("amount must be non-zero")]
    ZeroAmount,
}

impl Transfer {
    pub fn new(to_account: AccountId, amount: i64) -> Result<Self, TransferError> {
        if to_account <= 0 {
            return Err(TransferError::InvalidDestination(to_account));
        }
        if amount == 0 {
            return Err(TransferError::ZeroAmount);
        }
        Ok(Self { to_account, amount })
    }
}
