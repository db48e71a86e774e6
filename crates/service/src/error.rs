//! Service-level error taxonomy.

use thiserror::Error;

use finbook_auth::AuthError;
use finbook_store::StoreError;

/// Every way a ledger operation can fail.
///
/// Business-rule failures are detected before any write and never leave
/// partial state. The "not found" variants deliberately cover both missing
/// and not-owned resources so existence never leaks across users.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Credential failed verification (signature, structure, time window).
    #[error("invalid credential: {0}")]
    InvalidCredential(#[from] AuthError),

    /// A structurally valid credential references no live user, or a
    /// transfer names a nonexistent receiver.
    #[error("User not found")]
    UserNotFound,

    /// Zero or negative amount, regardless of balance.
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// The write would push the owner's balance below zero.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Missing, or owned by another user.
    #[error("Statement not found")]
    StatementNotFound,

    /// Sender and receiver are the same user.
    #[error("Cannot transfer to the same user")]
    SelfTransfer,

    /// Storage/transaction failure; retryable at the caller's discretion.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl ServiceError {
    /// Transport mapping for an HTTP adapter, without binding the core to
    /// one.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::InvalidCredential(_) => 401,
            ServiceError::UserNotFound | ServiceError::StatementNotFound => 404,
            ServiceError::InvalidAmount
            | ServiceError::InsufficientFunds
            | ServiceError::SelfTransfer => 400,
            ServiceError::Persistence(_) => 500,
        }
    }
}
