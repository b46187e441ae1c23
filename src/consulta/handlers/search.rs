use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use super::extract_session_id;
use crate::consulta::AppState;
use crate::display::{self, Section};
use crate::errors::Error;
use crate::search::{self, Query, SearchMode};

#[derive(Deserialize, Debug)]
pub struct SearchRequest {
    mode: SearchMode,
    term: String,
}

#[derive(Serialize)]
struct SearchResponse {
    count: usize,
    sections: Vec<Section>,
}

/// axum handler for search. Requires a live session; an empty result set
/// is a valid 200 with `count: 0`, while a missing target column is a
/// data/config mismatch reported as a server error.
pub async fn search(
    state: Extension<Arc<AppState>>,
    headers: HeaderMap,
    payload: Option<Json<SearchRequest>>,
) -> impl IntoResponse {
    let Some(session_id) = extract_session_id(&headers, state.credentials.cookie_name()) else {
        return (StatusCode::UNAUTHORIZED, "login required".to_string()).into_response();
    };

    let Some(session) = state.sessions.authenticate(&session_id).await else {
        return (StatusCode::UNAUTHORIZED, "login required".to_string()).into_response();
    };

    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    debug!("search {:?} by {}", request.mode, session.username());

    let query = Query {
        mode: request.mode,
        term: request.term,
    };

    match search::search(&state.dataset, &query) {
        Ok(matches) => {
            let sections = display::project(&state.dataset, &matches);

            (
                StatusCode::OK,
                Json(SearchResponse {
                    count: matches.len(),
                    sections,
                }),
            )
                .into_response()
        }

        Err(Error::EmptyQuery) => (
            StatusCode::BAD_REQUEST,
            "enter a search term".to_string(),
        )
            .into_response(),

        Err(Error::UnknownColumn(column)) => {
            error!("column {column} missing from the dataset, check the spreadsheet export");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("column {column} not available"),
            )
                .into_response()
        }

        Err(e) => {
            error!("search failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
