//! Startup configuration and component wiring.

use std::sync::Arc;

use finbook_auth::Hs256Authenticator;
use finbook_store::InMemoryStore;

use crate::service::StatementService;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Self { jwt_secret }
    }
}

/// Everything a running process holds: built once at startup, injected into
/// every component, dropped at shutdown. No global state.
pub struct AppContext {
    pub authenticator: Arc<Hs256Authenticator>,
    pub store: Arc<InMemoryStore>,
    pub service: StatementService,
}

impl AppContext {
    /// Wire the service against the embedded in-memory store.
    pub fn in_memory(config: &AppConfig) -> Self {
        let authenticator = Arc::new(Hs256Authenticator::new(config.jwt_secret.clone()));
        let store = Arc::new(InMemoryStore::new());
        let service = StatementService::new(
            authenticator.clone(),
            store.clone(),
            store.clone(),
        );

        Self {
            authenticator,
            store,
            service,
        }
    }
}
