use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

use super::session_cookie;
use crate::consulta::AppState;
use crate::errors::Error;

// Plaintext stays inside this struct; no Debug derive, nothing logged.
#[derive(Deserialize)]
pub struct Login {
    username: String,
    password: String,
}

/// axum handler for login.
///
/// Unknown user and wrong password collapse into one generic rejection so
/// callers cannot probe which field was wrong. A malformed stored hash is
/// logged distinctly: that is a provisioning bug, not a user error.
pub async fn login(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<Login>>,
) -> impl IntoResponse {
    let Some(Json(login)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    match state
        .sessions
        .login(&state.credentials, &login.username, &login.password)
        .await
    {
        Ok(session_id) => {
            let name = state
                .credentials
                .name_for(&login.username)
                .unwrap_or(&login.username)
                .to_string();

            let cookie = match session_cookie(
                state.credentials.cookie_name(),
                &session_id,
                state.credentials.session_ttl().as_secs(),
            ) {
                Ok(cookie) => cookie,
                Err(e) => {
                    error!("Error building session cookie: {e}");
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
            };

            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);

            (
                StatusCode::OK,
                headers,
                Json(json!({ "username": login.username, "name": name })),
            )
                .into_response()
        }

        Err(Error::UnknownUser | Error::BadPassword) => {
            warn!("login rejected for {}", login.username);
            (
                StatusCode::UNAUTHORIZED,
                "invalid credentials".to_string(),
            )
                .into_response()
        }

        Err(Error::HashFormat) => {
            error!(
                "stored hash for {} is malformed, re-provision the secrets file",
                login.username
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "credential store problem".to_string(),
            )
                .into_response()
        }

        Err(e) => {
            error!("login failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
