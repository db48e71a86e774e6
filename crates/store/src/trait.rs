use std::sync::Arc;

use thiserror::Error;

use finbook_core::{StatementId, UserId};
use finbook_ledger::{Operation, Statement, StatementDraft, User, UserDraft};

/// Storage operation error.
///
/// These are **infrastructure** failures (backend, transaction, malformed
/// write), as opposed to business-rule failures, which the service detects
/// before any write. `Backend` failures are retryable at the caller's
/// discretion; nothing here is silently swallowed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("invalid write: {0}")]
    InvalidWrite(String),
}

/// Durable storage for registered users.
///
/// `create_user` and `find_user_by_email` belong to the external
/// registration flow; the core itself only reads by id.
pub trait UserStore: Send + Sync {
    fn create_user(&self, draft: UserDraft) -> Result<User, StoreError>;

    fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Durable, append-only storage for ledger entries.
///
/// Implementations must:
/// - assign id and timestamps at write time
/// - preserve creation order within a user's ledger
/// - commit the two entries of `create_transfer_pair` atomically (both or
///   neither)
/// - answer `find_by_id_and_user` with *not found* when the id exists under
///   another owner, so existence never leaks across users
pub trait StatementStore: Send + Sync {
    /// Persist one entry, returning it with generated id/timestamps.
    fn create(&self, draft: StatementDraft) -> Result<Statement, StoreError>;

    /// Persist a transfer's two linked entries as a single atomic unit.
    ///
    /// Rejects pairs whose roles, amounts, or counterpart links do not form
    /// one well-formed transfer, without committing anything.
    fn create_transfer_pair(
        &self,
        sender: StatementDraft,
        receiver: StatementDraft,
    ) -> Result<(Statement, Statement), StoreError>;

    fn find_by_id(&self, id: StatementId) -> Result<Option<Statement>, StoreError>;

    /// Ownership-scoped lookup. `None` covers both "does not exist" and
    /// "belongs to someone else".
    fn find_by_id_and_user(
        &self,
        id: StatementId,
        user_id: UserId,
    ) -> Result<Option<Statement>, StoreError>;

    /// All of a user's entries, in creation order.
    fn list_by_user(&self, user_id: UserId) -> Result<Vec<Statement>, StoreError>;
}

impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    fn create_user(&self, draft: UserDraft) -> Result<User, StoreError> {
        (**self).create_user(draft)
    }

    fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).find_user(id)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        (**self).find_user_by_email(email)
    }
}

impl<S> StatementStore for Arc<S>
where
    S: StatementStore + ?Sized,
{
    fn create(&self, draft: StatementDraft) -> Result<Statement, StoreError> {
        (**self).create(draft)
    }

    fn create_transfer_pair(
        &self,
        sender: StatementDraft,
        receiver: StatementDraft,
    ) -> Result<(Statement, Statement), StoreError> {
        (**self).create_transfer_pair(sender, receiver)
    }

    fn find_by_id(&self, id: StatementId) -> Result<Option<Statement>, StoreError> {
        (**self).find_by_id(id)
    }

    fn find_by_id_and_user(
        &self,
        id: StatementId,
        user_id: UserId,
    ) -> Result<Option<Statement>, StoreError> {
        (**self).find_by_id_and_user(id, user_id)
    }

    fn list_by_user(&self, user_id: UserId) -> Result<Vec<Statement>, StoreError> {
        (**self).list_by_user(user_id)
    }
}

/// Validate that two drafts form one well-linked transfer.
///
/// Shared by implementations so every backend enforces the same pair shape
/// before starting its transaction.
pub(crate) fn check_transfer_pair(
    sender: &StatementDraft,
    receiver: &StatementDraft,
) -> Result<(), StoreError> {
    match (&sender.operation, &receiver.operation) {
        (
            Operation::TransferSent { counterpart: to },
            Operation::TransferReceived { counterpart: from },
        ) => {
            if *to != receiver.user_id || *from != sender.user_id {
                return Err(StoreError::InvalidWrite(
                    "transfer pair counterpart ids do not cross-reference".to_string(),
                ));
            }
        }
        _ => {
            return Err(StoreError::InvalidWrite(
                "transfer pair must be one sent and one received entry".to_string(),
            ));
        }
    }

    if sender.user_id == receiver.user_id {
        return Err(StoreError::InvalidWrite(
            "transfer pair references a single user".to_string(),
        ));
    }
    if sender.amount != receiver.amount {
        return Err(StoreError::InvalidWrite(
            "transfer pair amounts differ".to_string(),
        ));
    }

    Ok(())
}
