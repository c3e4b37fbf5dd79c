use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the universities table.
///
/// Rows are fetched fresh per request and passed through without local
/// mutation, so every field is optional and the tuition fee is kept as raw
/// JSON (the source table stores it as a number in some rows and a string in
/// others). Columns outside the known projection are carried in `extra` so
/// `GET /universities` returns rows exactly as the backend stored them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversityRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuition_fees_usd: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniversitiesResponse {
    pub data: Vec<UniversityRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: String,
}
