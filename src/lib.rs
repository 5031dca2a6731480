//! # Tessera (Session Authentication)
//!
//! `tessera` binds opaque, server-side session tokens to user identities and
//! decides per request whether a caller is authenticated.
//!
//! ## Session Lifecycle
//!
//! - **Login:** a verified email/password pair yields a fresh `UUIDv4` token,
//!   stored in the [`auth::SessionStore`] and handed to the client as a cookie.
//! - **Requests:** every non-exempt path resolves the cookie (or a Basic
//!   `Authorization` header, depending on the configured strategy) to a user.
//! - **Logout:** the token is revoked. Revocation is idempotent.
//!
//! Sessions never expire on their own; a token lives until it is revoked or the
//! process restarts.
//!
//! ## Path Exemptions
//!
//! Exempt paths are compared exactly after normalizing a trailing `/`, so
//! `/api/v1/status` and `/api/v1/status/` are the same route. There is no prefix
//! or wildcard matching.
//!
//! ## Passwords
//!
//! Passwords are stored as `argon2` PHC strings and only ever compared through
//! the hashing library.

pub mod api;
pub mod auth;
pub mod cli;
pub mod redact;
pub mod users;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
