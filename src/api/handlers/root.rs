use axum::Json;

use crate::models::RootResponse;

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Dream University API is live".to_string(),
    })
}
