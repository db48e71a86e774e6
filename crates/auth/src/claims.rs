use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use finbook_core::UserId;

use crate::token::AuthError;

/// Bearer-token claims model (transport-agnostic).
///
/// This is the minimal set of claims finbook expects once a token has been
/// decoded and its signature verified. Timestamps are numeric seconds since
/// the epoch, matching the JWT wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user the credential was issued to.
    pub sub: UserId,

    /// Issued-at (seconds since epoch).
    pub iat: i64,

    /// Expiration (seconds since epoch).
    pub exp: i64,
}

/// Deterministically validate the claims time window.
///
/// Note: this validates the *claims* only. Signature verification and
/// decoding live in [`crate::token`].
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), AuthError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(AuthError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(AuthError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(AuthError::Expired);
    }
    Ok(())
}
