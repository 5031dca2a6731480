//! Login and logout.
//!
//! Login binds a fresh session to the user's identity and hands the token
//! back as a cookie. Logout revokes whatever session the cookie names.

use axum::{
    extract::{Extension, Form},
    http::{
        header::{InvalidHeaderValue, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::types::{error_response, field, CredentialsForm, ErrorBody, UserResponse};
use crate::{api::AuthState, users::accounts};

#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    request_body(content = CredentialsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Session created, cookie set", body = UserResponse),
        (status = 400, description = "Email or password missing", body = ErrorBody),
        (status = 401, description = "Unknown email or wrong password", body = ErrorBody)
    ),
    tag = "sessions"
)]
#[instrument(skip_all)]
pub async fn login(
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

    let user = match accounts::authenticate(state.users(), &email, &password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!("Login rejected");
            return error_response(StatusCode::UNAUTHORIZED, "invalid credentials");
        }
        Err(err) => {
            error!("Failed to authenticate: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(token) = state.session().create_session(&user.identity()) else {
        error!("Failed to create session for user {}", user.id);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let mut headers = HeaderMap::new();
    match session_cookie(&state, &token) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            state.session().destroy_session(Some(&token));
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    info!(user = %user.id, "Session started");
    (StatusCode::CREATED, headers, Json(UserResponse::from(&user))).into_response()
}

#[utoipa::path(
    delete,
    path = "/api/v1/sessions",
    responses(
        (status = 200, description = "Session revoked, cookie cleared"),
        (status = 403, description = "No live session")
    ),
    tag = "sessions"
)]
#[instrument(skip_all)]
pub async fn logout(headers: HeaderMap, state: Extension<Arc<AuthState>>) -> Response {
    if !state.session().destroy_request_session(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }

    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(&state) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::OK, response_headers, Json(json!({}))).into_response()
}

/// `HttpOnly` cookie carrying the session token; no `Max-Age` since sessions
/// live until logout.
pub(crate) fn session_cookie(
    state: &AuthState,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let name = state.config().session_name();
    let mut cookie = format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax");
    if state.config().session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie(state: &AuthState) -> Result<HeaderValue, InvalidHeaderValue> {
    let name = state.config().session_name();
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if state.config().session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
