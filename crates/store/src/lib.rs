//! `finbook-store` — persistence boundary for users and statements.
//!
//! The service consumes storage only through the traits in this crate. The
//! in-memory implementation backs tests and the demo binary; a relational
//! backend would implement the same contracts with database transactions.

mod in_memory;
mod r#trait;

pub use in_memory::InMemoryStore;
pub use r#trait::{StatementStore, StoreError, UserStore};
