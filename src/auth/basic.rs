//! HTTP Basic authentication.
//!
//! `Authorization: Basic <base64(email:password)>` is taken apart in three
//! steps (strip scheme, decode, split on the first `:`) and the pair is checked
//! against the user store.

use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD, Engine};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::{AuthError, Authenticator, RequestPolicy};
use crate::users::{accounts, User, UserStore};

const BASIC_PREFIX: &str = "Basic ";

#[derive(Debug)]
pub struct BasicCredentials {
    pub identity: String,
    pub secret: SecretString,
}

/// Strip the literal `Basic ` scheme prefix.
///
/// # Errors
/// `InvalidInput` when the header is absent or uses another scheme.
pub fn extract_base64_authorization_header(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .ok_or(AuthError::InvalidInput("missing authorization header"))?
        .strip_prefix(BASIC_PREFIX)
        .ok_or(AuthError::InvalidInput("not a Basic authorization header"))
}

/// Decode the base64 payload into UTF-8 text.
///
/// # Errors
/// `Decode` on invalid base64 or invalid UTF-8.
pub fn decode_base64_authorization_header(encoded: &str) -> Result<String, AuthError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| AuthError::Decode("invalid base64"))?;
    String::from_utf8(bytes).map_err(|_| AuthError::Decode("invalid UTF-8"))
}

/// Split decoded text on the first `:`; the secret may itself contain `:`.
///
/// # Errors
/// `Decode` when there is no `:`.
pub fn extract_user_credentials(decoded: &str) -> Result<BasicCredentials, AuthError> {
    let (identity, secret) = decoded
        .split_once(':')
        .ok_or(AuthError::Decode("missing ':' separator"))?;
    Ok(BasicCredentials {
        identity: identity.to_string(),
        secret: SecretString::from(secret.to_string()),
    })
}

/// Full Basic header parse.
///
/// # Errors
/// Any failure of the three steps above.
pub fn extract_basic_credentials(header: Option<&str>) -> Result<BasicCredentials, AuthError> {
    let encoded = extract_base64_authorization_header(header)?;
    let decoded = decode_base64_authorization_header(encoded)?;
    extract_user_credentials(&decoded)
}

#[derive(Clone, Debug)]
pub struct BasicAuthenticator {
    policy: RequestPolicy,
    users: UserStore,
}

impl BasicAuthenticator {
    #[must_use]
    pub fn new(policy: RequestPolicy, users: UserStore) -> Self {
        Self { policy, users }
    }

    /// User matching `email` whose stored hash verifies `secret`.
    pub async fn user_object_from_credentials(
        &self,
        email: &str,
        secret: &SecretString,
    ) -> Option<User> {
        match accounts::authenticate(&self.users, email, secret).await {
            Ok(user) => user,
            Err(err) => {
                debug!("Basic credential check failed: {err}");
                None
            }
        }
    }
}

impl Authenticator for BasicAuthenticator {
    fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    async fn current_identity(&self, headers: &HeaderMap) -> Option<User> {
        let credentials = match extract_basic_credentials(self.authorization_header(headers)) {
            Ok(credentials) => credentials,
            Err(err) => {
                debug!("Rejected authorization header: {err}");
                return None;
            }
        };
        if credentials.secret.expose_secret().is_empty() {
            return None;
        }
        self.user_object_from_credentials(&credentials.identity, &credentials.secret)
            .await
    }
}
