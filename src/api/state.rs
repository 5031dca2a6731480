//! Shared request state and authentication configuration.

use std::sync::Arc;

use crate::auth::{
    AuthStrategy, AuthType, BasicAuthenticator, ExemptPaths, MemorySessionStore, RequestPolicy,
    SessionAuthenticator, SessionStore, DEFAULT_SESSION_NAME,
};
use crate::users::UserStore;

pub const DEFAULT_EXEMPT_PATHS: [&str; 3] =
    ["/api/v1/status/", "/api/v1/sessions/", "/api/v1/users/"];

#[derive(Clone, Debug)]
pub struct AuthConfig {
    auth_type: AuthType,
    session_name: String,
    exempt_paths: ExemptPaths,
    session_cookie_secure: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(auth_type: AuthType) -> Self {
        Self {
            auth_type,
            session_name: DEFAULT_SESSION_NAME.to_string(),
            exempt_paths: ExemptPaths::new(DEFAULT_EXEMPT_PATHS),
            session_cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_session_name(mut self, name: String) -> Self {
        self.session_name = name;
        self
    }

    #[must_use]
    pub fn with_exempt_paths(mut self, paths: ExemptPaths) -> Self {
        self.exempt_paths = paths;
        self
    }

    #[must_use]
    pub fn with_session_cookie_secure(mut self, secure: bool) -> Self {
        self.session_cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    #[must_use]
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    #[must_use]
    pub fn exempt_paths(&self) -> &ExemptPaths {
        &self.exempt_paths
    }

    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(AuthType::default())
    }
}

pub struct AuthState {
    config: AuthConfig,
    users: UserStore,
    session: SessionAuthenticator,
    strategy: AuthStrategy,
}

impl AuthState {
    /// Build the state around an existing session store.
    #[must_use]
    pub fn new(config: AuthConfig, users: UserStore, sessions: Arc<dyn SessionStore>) -> Self {
        let policy = RequestPolicy::new(config.exempt_paths().clone(), config.session_name());
        let session = SessionAuthenticator::new(policy.clone(), sessions, users.clone());
        let strategy = match config.auth_type() {
            AuthType::Basic => AuthStrategy::Basic(BasicAuthenticator::new(policy, users.clone())),
            AuthType::Session => AuthStrategy::Session(session.clone()),
        };
        Self {
            config,
            users,
            session,
            strategy,
        }
    }

    /// State backed by a fresh in-memory session store.
    #[must_use]
    pub fn in_memory(config: AuthConfig, users: UserStore) -> Self {
        Self::new(config, users, Arc::new(MemorySessionStore::new()))
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Session operations (login/logout) regardless of the request strategy.
    #[must_use]
    pub fn session(&self) -> &SessionAuthenticator {
        &self.session
    }

    /// Strategy used to authenticate guarded requests.
    #[must_use]
    pub fn authenticator(&self) -> &AuthStrategy {
        &self.strategy
    }
}
