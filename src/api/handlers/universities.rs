use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::api::AppState;
use crate::models::UniversitiesResponse;

/// Return every row of the universities table as stored.
///
/// Fetch failures answer 502 with the error text in an `error` field. The
/// upstream behavior this replaces shipped the same body with HTTP 200; no
/// client was found relying on that, so a real error status is used here.
pub async fn get_universities(State(state): State<AppState>) -> Response {
    match state.db.select("*").await {
        Ok(rows) => Json(UniversitiesResponse { data: rows }).into_response(),
        Err(e) => {
            tracing::error!("University fetch failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
