use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use finbook_core::UserId;

use crate::claims::{Claims, validate_claims};

/// Credential verification error.
///
/// Everything here collapses to "401 invalid credential" at the transport
/// boundary; the variants exist for logging and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed credential: {0}")]
    Malformed(String),

    #[error("invalid signature")]
    BadSignature,

    #[error("credential has expired")]
    Expired,

    #[error("credential not yet valid")]
    NotYetValid,

    #[error("invalid credential time window")]
    InvalidTimeWindow,

    #[error("credential encoding failed: {0}")]
    Encoding(String),
}

/// Resolves an opaque bearer credential to a verified subject.
///
/// Implementations verify signature, structure, and time window. They do
/// **not** check that the subject still exists; that lookup belongs to the
/// authorization guard, which has access to the user store.
pub trait Authenticator: Send + Sync {
    fn resolve(&self, credential: &str, now: DateTime<Utc>) -> Result<UserId, AuthError>;
}

impl<A> Authenticator for Arc<A>
where
    A: Authenticator + ?Sized,
{
    fn resolve(&self, credential: &str, now: DateTime<Utc>) -> Result<UserId, AuthError> {
        (**self).resolve(credential, now)
    }
}

/// HS256 JWT authenticator.
///
/// The shared secret comes from configuration; token *issuance* is an
/// external concern, but [`Hs256Authenticator::mint`] exists so tests and dev
/// tooling can produce credentials this authenticator accepts.
pub struct Hs256Authenticator {
    key: Vec<u8>,
}

impl Hs256Authenticator {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { key: secret.into() }
    }

    /// Sign a credential for `user` valid from `now` for `ttl`.
    pub fn mint(
        &self,
        user: UserId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.key),
        )
        .map_err(|e| AuthError::Encoding(e.to_string()))
    }
}

impl Authenticator for Hs256Authenticator {
    fn resolve(&self, credential: &str, now: DateTime<Utc>) -> Result<UserId, AuthError> {
        // Time-window checks are ours (validate_claims): disable the
        // library's leeway-based exp handling so the window is exact.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(
            credential,
            &DecodingKey::from_secret(&self.key),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::BadSignature,
            _ => AuthError::Malformed(e.to_string()),
        })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims.sub)
    }
}
