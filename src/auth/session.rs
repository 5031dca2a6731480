//! Cookie-backed session authentication.

use axum::http::HeaderMap;
use std::{fmt, sync::Arc};
use tracing::{debug, error};
use uuid::Uuid;

use super::{AuthError, Authenticator, RequestPolicy, SessionStore};
use crate::users::{User, UserStore};

/// Resolve `token` through `lookup`; missing or empty tokens are `NotFound`
/// without consulting the lookup.
///
/// # Errors
/// `NotFound` for a missing token, otherwise whatever `lookup` returns.
pub fn current_identity_via_session<F>(lookup: F, token: Option<&str>) -> Result<String, AuthError>
where
    F: FnOnce(&str) -> Result<String, AuthError>,
{
    match token {
        Some(token) if !token.is_empty() => lookup(token),
        _ => Err(AuthError::NotFound),
    }
}

#[derive(Clone)]
pub struct SessionAuthenticator {
    policy: RequestPolicy,
    sessions: Arc<dyn SessionStore>,
    users: UserStore,
}

impl SessionAuthenticator {
    #[must_use]
    pub fn new(policy: RequestPolicy, sessions: Arc<dyn SessionStore>, users: UserStore) -> Self {
        Self {
            policy,
            sessions,
            users,
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    /// Start a session for `identity`; `None` for an empty identity.
    #[must_use]
    pub fn create_session(&self, identity: &str) -> Option<String> {
        match self.sessions.create(identity) {
            Ok(token) => Some(token),
            Err(err) => {
                debug!("Refused to create session: {err}");
                None
            }
        }
    }

    /// Identity bound to `token`, if the session is live.
    #[must_use]
    pub fn user_id_for_session_id(&self, token: Option<&str>) -> Option<String> {
        current_identity_via_session(|token| self.sessions.resolve(token), token).ok()
    }

    /// Revoke `token`; `false` when it is missing or not live.
    pub fn destroy_session(&self, token: Option<&str>) -> bool {
        if self.user_id_for_session_id(token).is_none() {
            return false;
        }
        token.is_some_and(|token| self.sessions.revoke(token))
    }

    /// Revoke the session named by the request's cookie.
    pub fn destroy_request_session(&self, headers: &HeaderMap) -> bool {
        let token = self.session_cookie(headers);
        self.destroy_session(token.as_deref())
    }
}

impl fmt::Debug for SessionAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionAuthenticator")
            .field("policy", &self.policy)
            .field("sessions", &self.sessions.len())
            .field("users", &self.users.backend())
            .finish()
    }
}

impl Authenticator for SessionAuthenticator {
    fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    async fn current_identity(&self, headers: &HeaderMap) -> Option<User> {
        let token = self.session_cookie(headers);
        let identity = self.user_id_for_session_id(token.as_deref())?;
        let Ok(id) = Uuid::parse_str(&identity) else {
            debug!("Session bound to a non-user identity");
            return None;
        };
        match self.users.find_by_id(id).await {
            Ok(user) => user,
            Err(err) => {
                error!("Failed to load session user: {err:#}");
                None
            }
        }
    }
}
