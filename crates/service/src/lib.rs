//! `finbook-service` — the statement service.
//!
//! Front door for every ledger operation: resolves and authorizes the
//! caller's credential, validates the request against the current balance,
//! and writes entries through the store under per-user serialization.

pub mod context;
pub mod error;
pub mod guard;
pub mod locks;
pub mod service;
pub mod telemetry;

#[cfg(test)]
mod integration_tests;

pub use context::{AppConfig, AppContext};
pub use error::ServiceError;
pub use guard::Guard;
pub use service::{BalanceView, StatementService, TransferReceipt};
