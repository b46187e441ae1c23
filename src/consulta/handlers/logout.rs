use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::error;

use super::{clear_session_cookie, extract_session_id};
use crate::consulta::AppState;

/// axum handler for logout. Always clears the cookie, even when the
/// session record was already gone.
pub async fn logout(state: Extension<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(session_id) = extract_session_id(&headers, state.credentials.cookie_name()) {
        state.sessions.logout(&session_id).await;
    }

    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(state.credentials.cookie_name()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(e) => error!("Error building logout cookie: {e}"),
    }

    (StatusCode::NO_CONTENT, response_headers)
}
