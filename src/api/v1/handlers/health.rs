/*
 * Responsibility
 * - GET /health (疎通用)
 * - IdP への疎通は確認しない (JWKS の取得失敗は Deny で表現される)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
