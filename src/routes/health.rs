use axum::Json;

use crate::response::ApiResponse;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<serde_json::Value>),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::message_only("Server is running"))
}
