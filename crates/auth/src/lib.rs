//! `finbook-auth` — pure authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns an
//! opaque bearer credential into a verified [`finbook_core::UserId`], nothing
//! more. Whether that id corresponds to a live user is the service guard's
//! problem.

pub mod claims;
pub mod token;

pub use claims::{Claims, validate_claims};
pub use token::{AuthError, Authenticator, Hs256Authenticator};
