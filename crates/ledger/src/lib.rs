//! `finbook-ledger` — statement domain model.
//!
//! A user's ledger is an append-only sequence of immutable [`Statement`]
//! entries; the balance is always derived by folding that sequence, never
//! stored.

pub mod balance;
pub mod statement;
pub mod user;

pub use balance::balance_of;
pub use statement::{Operation, Statement, StatementDraft};
pub use user::{User, UserDraft};
