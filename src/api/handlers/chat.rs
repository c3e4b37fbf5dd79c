use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::error::Result;
use crate::llm::UNAVAILABLE_MESSAGE;
use crate::models::{ChatRequest, ChatResponse};
use crate::prompt::build_prompt;

/// Columns embedded in the prompt's data table.
const CHAT_PROJECTION: &str = "name,country,tuition_fees_usd,tags";

/// Answer a counselling question.
///
/// Fetches the current table, assembles the persona prompt around it and the
/// user message, and returns the model's text. Any failure along the way maps
/// to a 500 with the error text in `detail` (via `GatewayError`). With no
/// usable model the reply is a fixed unavailable message, not an error.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if !state.model.is_available() {
        return Ok(Json(ChatResponse {
            response: UNAVAILABLE_MESSAGE.to_string(),
        }));
    }

    let records = state.db.select(CHAT_PROJECTION).await?;
    let prompt = build_prompt(state.config.persona, &records, &req.message);
    let text = state.model.generate(&prompt).await?;

    Ok(Json(ChatResponse { response: text }))
}
