//! Authorization guard: credential → live user.

use std::sync::Arc;

use chrono::Utc;

use finbook_auth::Authenticator;
use finbook_ledger::User;
use finbook_store::UserStore;

use crate::error::ServiceError;

/// Binds an authenticated identity to a permitted user.
///
/// Resolving the credential proves who signed it; the store lookup proves
/// the subject still exists. A structurally valid token for a deleted or
/// never-existing user is rejected here, which is the defense against
/// stale or forged tokens.
pub struct Guard {
    authenticator: Arc<dyn Authenticator>,
    users: Arc<dyn UserStore>,
}

impl Guard {
    pub fn new(authenticator: Arc<dyn Authenticator>, users: Arc<dyn UserStore>) -> Self {
        Self {
            authenticator,
            users,
        }
    }

    /// Resolve `credential` and return the acting user.
    ///
    /// Every service entry point calls this first; the user id flowing into
    /// ledger operations is always the one proven here, never a
    /// client-supplied value.
    pub fn authorize(&self, credential: &str) -> Result<User, ServiceError> {
        let user_id = self.authenticator.resolve(credential, Utc::now())?;

        self.users
            .find_user(user_id)?
            .ok_or(ServiceError::UserNotFound)
    }
}
