use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::users::User;

/// Public view of a user; never carries the password hash.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// `email`/`password` form used by registration and login.
#[derive(ToSchema, Deserialize)]
pub struct CredentialsForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Deserialize)]
pub struct PasswordForm {
    pub password: Option<String>,
}

/// The user resolved by the guard for the current request.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Non-empty form value, if any.
pub(crate) fn field(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
