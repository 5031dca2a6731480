use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::types::{
    error_response, field, CredentialsForm, CurrentUser, ErrorBody, PasswordForm, UserResponse,
};
use crate::{api::AuthState, auth::AuthError, users::accounts};

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Email or password missing or invalid", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn register(
    state: Extension<Arc<AuthState>>,
    payload: Option<Form<CredentialsForm>>,
) -> Response {
    let (email, password) = match payload {
        Some(Form(form)) => (field(form.email), field(form.password)),
        None => (None, None),
    };
    let Some(email) = email else {
        return error_response(StatusCode::BAD_REQUEST, "email missing");
    };
    let Some(password) = password.map(SecretString::from) else {
        return error_response(StatusCode::BAD_REQUEST, "password missing");
    };

    match accounts::register(state.users(), &email, &password).await {
        Ok(user) => {
            info!(user = %user.id, "User registered");
            (StatusCode::CREATED, Json(UserResponse::from(&user))).into_response()
        }
        Err(AuthError::InvalidInput(_)) => error_response(StatusCode::BAD_REQUEST, "invalid email"),
        Err(AuthError::AlreadyExists) => {
            error_response(StatusCode::CONFLICT, "email already registered")
        }
        Err(err) => {
            error!("Failed to register user: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Authenticated user", body = UserResponse),
        (status = 401, description = "No credentials supplied"),
        (status = 403, description = "Credentials not accepted")
    ),
    tag = "users"
)]
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> impl IntoResponse {
    Json(UserResponse::from(&user))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/me/password",
    request_body(content = PasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Password missing", body = ErrorBody),
        (status = 401, description = "No credentials supplied"),
        (status = 403, description = "Credentials not accepted")
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn change_password(
    state: Extension<Arc<AuthState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Option<Form<PasswordForm>>,
) -> Response {
    let password = payload.and_then(|Form(form)| field(form.password));
    let Some(password) = password.map(SecretString::from) else {
        return error_response(StatusCode::BAD_REQUEST, "password missing");
    };

    match accounts::change_password(state.users(), user.id, &password).await {
        Ok(()) => {
            info!(user = %user.id, "Password changed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(AuthError::NotFound) => StatusCode::FORBIDDEN.into_response(),
        Err(err) => {
            error!("Failed to change password: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
