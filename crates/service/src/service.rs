//! The statement service: validated, serialized ledger operations.

use std::sync::Arc;

use serde::Serialize;

use finbook_auth::Authenticator;
use finbook_core::{Money, StatementId, UserId};
use finbook_ledger::{Statement, StatementDraft, balance_of};
use finbook_store::{StatementStore, UserStore};

use crate::error::ServiceError;
use crate::guard::Guard;
use crate::locks::{UserLockTable, hold};

/// Both sides of a committed transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub sender: Statement,
    pub receiver: Statement,
}

/// Current balance plus the full ordered history it derives from.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceView {
    pub balance: Money,
    pub statements: Vec<Statement>,
}

/// Executes deposit/withdraw/transfer/get-statement/get-balance requests.
///
/// Every entry point authorizes the credential first; balance-affecting
/// work then runs under the owner's lock so the `balance >= amount` check
/// and the write commit as one isolated unit.
pub struct StatementService {
    guard: Guard,
    users: Arc<dyn UserStore>,
    statements: Arc<dyn StatementStore>,
    locks: UserLockTable,
}

impl StatementService {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        users: Arc<dyn UserStore>,
        statements: Arc<dyn StatementStore>,
    ) -> Self {
        Self {
            guard: Guard::new(authenticator, users.clone()),
            users,
            statements,
            locks: UserLockTable::new(),
        }
    }

    /// Record a deposit for the credential's owner.
    pub fn deposit(
        &self,
        credential: &str,
        amount: Money,
        description: &str,
    ) -> Result<Statement, ServiceError> {
        let user = self.guard.authorize(credential)?;
        ensure_positive(amount)?;

        // Deposits commute with each other but not with a concurrent
        // withdrawal's check-then-write, so they serialize too.
        let cell = self.locks.cell(user.id);
        let _serialized = hold(&cell);

        let entry = self
            .statements
            .create(StatementDraft::deposit(user.id, amount, description))?;

        tracing::info!(
            user_id = %user.id,
            statement_id = %entry.id,
            amount = %amount,
            "deposit recorded"
        );
        Ok(entry)
    }

    /// Record a withdrawal; fails without writing if it would overdraw.
    pub fn withdraw(
        &self,
        credential: &str,
        amount: Money,
        description: &str,
    ) -> Result<Statement, ServiceError> {
        let user = self.guard.authorize(credential)?;
        ensure_positive(amount)?;

        let cell = self.locks.cell(user.id);
        let _serialized = hold(&cell);

        if self.balance_locked(user.id)? < amount {
            return Err(ServiceError::InsufficientFunds);
        }

        let entry = self
            .statements
            .create(StatementDraft::withdraw(user.id, amount, description))?;

        tracing::info!(
            user_id = %user.id,
            statement_id = %entry.id,
            amount = %amount,
            "withdrawal recorded"
        );
        Ok(entry)
    }

    /// Move funds from the credential's owner to `receiver_id`.
    ///
    /// Writes the two linked entries through the store's atomic pair-write;
    /// on any precondition failure nothing is committed.
    pub fn transfer(
        &self,
        credential: &str,
        receiver_id: UserId,
        amount: Money,
        description: &str,
    ) -> Result<TransferReceipt, ServiceError> {
        let sender = self.guard.authorize(credential)?;
        ensure_positive(amount)?;
        if receiver_id == sender.id {
            return Err(ServiceError::SelfTransfer);
        }
        let receiver = self
            .users
            .find_user(receiver_id)?
            .ok_or(ServiceError::UserNotFound)?;

        let (first, second) = self.locks.cells_ordered(sender.id, receiver.id);
        let _first = hold(&first);
        let _second = hold(&second);

        if self.balance_locked(sender.id)? < amount {
            return Err(ServiceError::InsufficientFunds);
        }

        let (sender_draft, receiver_draft) =
            StatementDraft::transfer_pair(sender.id, receiver.id, amount, description);
        let (sent, received) = self
            .statements
            .create_transfer_pair(sender_draft, receiver_draft)?;

        tracing::info!(
            sender_id = %sender.id,
            receiver_id = %receiver.id,
            amount = %amount,
            "transfer recorded"
        );
        Ok(TransferReceipt {
            sender: sent,
            receiver: received,
        })
    }

    /// Look up one of the caller's own statements.
    ///
    /// An id owned by another user answers exactly like a nonexistent one,
    /// so statement ids cannot be enumerated across users.
    pub fn get_statement(
        &self,
        credential: &str,
        statement_id: StatementId,
    ) -> Result<Statement, ServiceError> {
        let user = self.guard.authorize(credential)?;

        self.statements
            .find_by_id_and_user(statement_id, user.id)?
            .ok_or(ServiceError::StatementNotFound)
    }

    /// Current balance plus full history, from one consistent snapshot.
    pub fn get_balance(&self, credential: &str) -> Result<BalanceView, ServiceError> {
        let user = self.guard.authorize(credential)?;

        let cell = self.locks.cell(user.id);
        let _serialized = hold(&cell);

        let statements = self.statements.list_by_user(user.id)?;
        Ok(BalanceView {
            balance: balance_of(&statements),
            statements,
        })
    }

    /// Balance of `user_id`. Caller must hold that user's lock.
    fn balance_locked(&self, user_id: UserId) -> Result<Money, ServiceError> {
        Ok(balance_of(&self.statements.list_by_user(user_id)?))
    }
}

fn ensure_positive(amount: Money) -> Result<(), ServiceError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(ServiceError::InvalidAmount)
    }
}
