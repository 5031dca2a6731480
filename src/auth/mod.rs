//! Request authentication.
//!
//! Flow Overview: the guard asks the configured [`Authenticator`] whether the
//! request path [`requires_auth`](Authenticator::requires_auth); if so the
//! authenticator resolves the request's credentials (a Basic `Authorization`
//! header or a session cookie) to a [`User`].
//!
//! Strategies are interchangeable behind the trait and picked at startup via
//! [`AuthStrategy`]. The session table is injected as an `Arc<dyn SessionStore>`
//! so every authenticator built from the same state sees the same sessions.

pub mod basic;
pub mod credentials;
mod error;
pub mod paths;
pub mod session;
mod store;

pub use basic::{extract_basic_credentials, BasicAuthenticator, BasicCredentials};
pub use error::AuthError;
pub use paths::{requires_auth, ExemptPaths};
pub use session::{current_identity_via_session, SessionAuthenticator};
pub use store::{generate_session_token, MemorySessionStore, SessionRecord, SessionStore};

use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};
use std::{fmt, future::Future, str::FromStr};

use crate::users::User;

pub const DEFAULT_SESSION_NAME: &str = "_my_session_id";

/// Request-level settings shared by every strategy.
#[derive(Clone, Debug)]
pub struct RequestPolicy {
    exemptions: ExemptPaths,
    session_name: String,
}

impl RequestPolicy {
    #[must_use]
    pub fn new(exemptions: ExemptPaths, session_name: impl Into<String>) -> Self {
        Self {
            exemptions,
            session_name: session_name.into(),
        }
    }

    #[must_use]
    pub fn exemptions(&self) -> &ExemptPaths {
        &self.exemptions
    }

    #[must_use]
    pub fn session_name(&self) -> &str {
        &self.session_name
    }
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self::new(ExemptPaths::default(), DEFAULT_SESSION_NAME)
    }
}

pub trait Authenticator: Send + Sync {
    fn policy(&self) -> &RequestPolicy;

    fn requires_auth(&self, path: Option<&str>) -> bool {
        self.policy().exemptions().requires_auth(path)
    }

    /// Raw `Authorization` header value, if present and valid UTF-8.
    fn authorization_header<'h>(&self, headers: &'h HeaderMap) -> Option<&'h str> {
        headers.get(AUTHORIZATION)?.to_str().ok()
    }

    /// Value of the configured session cookie.
    fn session_cookie(&self, headers: &HeaderMap) -> Option<String> {
        cookie_value(headers, self.policy().session_name())
    }

    /// Resolve the request's credentials to a user; `None` means not authenticated.
    fn current_identity(&self, headers: &HeaderMap) -> impl Future<Output = Option<User>> + Send;
}

/// First value of the cookie called `name` across all `Cookie` headers.
#[must_use]
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| val.trim().to_string())
        })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthType {
    Basic,
    #[default]
    Session,
}

impl AuthType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "basic" | "basic_auth" => Ok(Self::Basic),
            "session" | "session_auth" => Ok(Self::Session),
            other => Err(format!("unknown auth type: {other}")),
        }
    }
}

/// The authenticator selected by configuration.
#[derive(Clone, Debug)]
pub enum AuthStrategy {
    Basic(BasicAuthenticator),
    Session(SessionAuthenticator),
}

impl AuthStrategy {
    #[must_use]
    pub const fn auth_type(&self) -> AuthType {
        match self {
            Self::Basic(_) => AuthType::Basic,
            Self::Session(_) => AuthType::Session,
        }
    }
}

impl Authenticator for AuthStrategy {
    fn policy(&self) -> &RequestPolicy {
        match self {
            Self::Basic(auth) => auth.policy(),
            Self::Session(auth) => auth.policy(),
        }
    }

    async fn current_identity(&self, headers: &HeaderMap) -> Option<User> {
        match self {
            Self::Basic(auth) => auth.current_identity(headers).await,
            Self::Session(auth) => auth.current_identity(headers).await,
        }
    }
}
