//! Registration, credential checks and password changes.
//!
//! Emails are normalized (trimmed, lowercased) before every lookup so that
//! registration and login agree on the key. Any non-blank string is accepted
//! as an email.

use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use super::{CreateOutcome, User, UserStore};
use crate::auth::{credentials, AuthError};

/// Normalize an email for lookup/uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Record verified against when the email is unknown, so a miss costs the
/// same argon2 work as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| credentials::hash("tessera-dummy").ok());

fn storage(err: &anyhow::Error) -> AuthError {
    error!("User store failure: {err:#}");
    AuthError::Storage(err.to_string())
}

/// Hash `password` and create the user.
///
/// # Errors
/// `InvalidInput` for a blank email, `AlreadyExists` when the email is
/// taken, `Hashing`/`Storage` for backend failures.
#[instrument(skip(users, password))]
pub async fn register(
    users: &UserStore,
    email: &str,
    password: &SecretString,
) -> Result<User, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AuthError::InvalidInput("email"));
    }

    let password_hash = credentials::hash(password.expose_secret())?;

    match users.create(&email, &password_hash).await {
        Ok(CreateOutcome::Created(user)) => {
            debug!("registered user {}", user.id);
            Ok(user)
        }
        Ok(CreateOutcome::Conflict) => Err(AuthError::AlreadyExists),
        Err(err) => Err(storage(&err)),
    }
}

/// Resolve an email/password pair to its user.
///
/// Unknown emails and wrong passwords are both `Ok(None)`.
///
/// # Errors
/// Returns `AuthError::Storage` when the user store fails.
#[instrument(skip(users, password))]
pub async fn authenticate(
    users: &UserStore,
    email: &str,
    password: &SecretString,
) -> Result<Option<User>, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Ok(None);
    }

    let user = users.find_by_email(&email).await.map_err(|err| storage(&err))?;

    match user {
        Some(user) => Ok(credentials::verify(&user.password_hash, password.expose_secret())
            .then_some(user)),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = credentials::verify(dummy, password.expose_secret());
            }
            Ok(None)
        }
    }
}

/// Whether the email/password pair matches a registered user.
///
/// # Errors
/// Returns `AuthError::Storage` when the user store fails.
pub async fn valid_login(
    users: &UserStore,
    email: &str,
    password: &SecretString,
) -> Result<bool, AuthError> {
    Ok(authenticate(users, email, password).await?.is_some())
}

/// Replace the password of an existing user.
///
/// # Errors
/// `NotFound` for an unknown id, `Hashing`/`Storage` for backend failures.
#[instrument(skip(users, password))]
pub async fn change_password(
    users: &UserStore,
    id: Uuid,
    password: &SecretString,
) -> Result<(), AuthError> {
    let password_hash = credentials::hash(password.expose_secret())?;
    match users.update_password_hash(id, &password_hash).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::NotFound),
        Err(err) => Err(storage(&err)),
    }
}
