use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use finbook_core::{StatementId, UserId};
use finbook_ledger::{Statement, StatementDraft, User, UserDraft};

use crate::r#trait::{StatementStore, StoreError, UserStore, check_transfer_pair};

/// In-memory store for users and statements.
///
/// Intended for tests/dev. Statements live in one append-only vector so
/// creation order is the storage order; per-user reads filter it.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    statements: RwLock<Vec<Statement>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn materialize(draft: StatementDraft) -> Statement {
        let now = Utc::now();
        Statement {
            id: StatementId::new(),
            user_id: draft.user_id,
            operation: draft.operation,
            amount: draft.amount,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

impl UserStore for InMemoryStore {
    fn create_user(&self, draft: UserDraft) -> Result<User, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;

        if users.values().any(|u| u.email == draft.email) {
            return Err(StoreError::InvalidWrite(format!(
                "email '{}' already registered",
                draft.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: draft.name,
            email: draft.email,
            password_hash: draft.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

impl StatementStore for InMemoryStore {
    fn create(&self, draft: StatementDraft) -> Result<Statement, StoreError> {
        let mut statements = self.statements.write().map_err(|_| poisoned())?;
        let entry = Self::materialize(draft);
        statements.push(entry.clone());
        Ok(entry)
    }

    fn create_transfer_pair(
        &self,
        sender: StatementDraft,
        receiver: StatementDraft,
    ) -> Result<(Statement, Statement), StoreError> {
        // Validate before touching storage, then append both under one
        // write-lock acquisition: either both land or neither does.
        check_transfer_pair(&sender, &receiver)?;

        let mut statements = self.statements.write().map_err(|_| poisoned())?;
        let sent = Self::materialize(sender);
        let received = Self::materialize(receiver);
        statements.push(sent.clone());
        statements.push(received.clone());
        Ok((sent, received))
    }

    fn find_by_id(&self, id: StatementId) -> Result<Option<Statement>, StoreError> {
        let statements = self.statements.read().map_err(|_| poisoned())?;
        Ok(statements.iter().find(|s| s.id == id).cloned())
    }

    fn find_by_id_and_user(
        &self,
        id: StatementId,
        user_id: UserId,
    ) -> Result<Option<Statement>, StoreError> {
        let statements = self.statements.read().map_err(|_| poisoned())?;
        Ok(statements
            .iter()
            .find(|s| s.id == id && s.user_id == user_id)
            .cloned())
    }

    fn list_by_user(&self, user_id: UserId) -> Result<Vec<Statement>, StoreError> {
        let statements = self.statements.read().map_err(|_| poisoned())?;
        Ok(statements
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }
}
