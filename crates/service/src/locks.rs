//! Per-user serialization for balance-affecting operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use finbook_core::UserId;

/// In-process lock table keyed by user id.
///
/// The balance check and the resulting write must execute as one isolated
/// unit per user, or two concurrent withdrawals can both observe a
/// sufficient balance and both commit. A relational backend would use
/// row-locking transactions for this; the embedded store uses these cells.
///
/// The mutexes guard no data of their own (state lives in the store), so a
/// poisoned cell is recovered rather than propagated.
#[derive(Debug, Default)]
pub struct UserLockTable {
    cells: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock cell for one user, creating it on first use.
    pub fn cell(&self, user: UserId) -> Arc<Mutex<()>> {
        let mut cells = self
            .cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cells.entry(user).or_default().clone()
    }

    /// Both participants' cells in canonical acquisition order.
    ///
    /// Always locking the lower user id first makes cross-transfer deadlock
    /// cycles impossible.
    pub fn cells_ordered(&self, a: UserId, b: UserId) -> (Arc<Mutex<()>>, Arc<Mutex<()>>) {
        if a.as_uuid() <= b.as_uuid() {
            (self.cell(a), self.cell(b))
        } else {
            (self.cell(b), self.cell(a))
        }
    }
}

/// Acquire a cell, recovering from poisoning.
pub fn hold(cell: &Arc<Mutex<()>>) -> MutexGuard<'_, ()> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}
