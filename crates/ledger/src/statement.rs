//! Ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use finbook_core::{Entity, Money, StatementId, UserId};

/// What a ledger entry does to its owner's balance.
///
/// A transfer is recorded as **two linked entries**, one per participant,
/// each carrying the counterpart's id. Serialization keeps the original
/// lowercase `type` tag on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Credits the owner.
    Deposit,
    /// Debits the owner; may not push the balance below zero.
    Withdraw,
    /// Debit side of a transfer; `counterpart` received the funds.
    TransferSent { counterpart: UserId },
    /// Credit side of a transfer; `counterpart` sent the funds.
    TransferReceived { counterpart: UserId },
}

impl Operation {
    /// Whether this entry increases the owner's balance.
    pub fn is_credit(&self) -> bool {
        matches!(self, Operation::Deposit | Operation::TransferReceived { .. })
    }

    /// The other participant, for transfer entries.
    pub fn counterpart(&self) -> Option<UserId> {
        match self {
            Operation::TransferSent { counterpart }
            | Operation::TransferReceived { counterpart } => Some(*counterpart),
            _ => None,
        }
    }
}

/// One immutable ledger entry.
///
/// Entries are never updated or deleted; `updated_at` exists for wire
/// compatibility and always equals `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: StatementId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub operation: Operation,
    pub amount: Money,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Statement {
    /// The entry's effect on its owner's balance, in minor units.
    pub fn signed_amount(&self) -> i64 {
        if self.operation.is_credit() {
            self.amount.minor_units()
        } else {
            -self.amount.minor_units()
        }
    }
}

impl Entity for Statement {
    type Id = StatementId;

    fn id(&self) -> &StatementId {
        &self.id
    }
}

/// Write model for a new entry: everything but the store-assigned id and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementDraft {
    pub user_id: UserId,
    pub operation: Operation,
    pub amount: Money,
    pub description: String,
}

impl StatementDraft {
    pub fn deposit(user_id: UserId, amount: Money, description: impl Into<String>) -> Self {
        Self {
            user_id,
            operation: Operation::Deposit,
            amount,
            description: description.into(),
        }
    }

    pub fn withdraw(user_id: UserId, amount: Money, description: impl Into<String>) -> Self {
        Self {
            user_id,
            operation: Operation::Withdraw,
            amount,
            description: description.into(),
        }
    }

    /// Build the two linked drafts of one transfer: the debit entry for the
    /// sender and the credit entry for the receiver.
    pub fn transfer_pair(
        sender: UserId,
        receiver: UserId,
        amount: Money,
        description: impl Into<String>,
    ) -> (Self, Self) {
        let description = description.into();
        (
            Self {
                user_id: sender,
                operation: Operation::TransferSent {
                    counterpart: receiver,
                },
                amount,
                description: description.clone(),
            },
            Self {
                user_id: receiver,
                operation: Operation::TransferReceived { counterpart: sender },
                amount,
                description,
            },
        )
    }
}
