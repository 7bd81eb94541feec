/*
 * Responsibility
 * - POST /authorize: gateway からの認可リクエストを受けて decision を返す
 * - 認可の成否にかかわらず 200 + decision (Deny 理由はサーバーログのみ)
 * - JSON として読めないリクエストだけ 400 (型違いのフィールドは Deny になる)
 */
use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    api::v1::dto::authorizer::AuthorizerRequest, error::AppError,
    services::auth::AuthorizationDecision, state::AppState,
};

pub async fn authorize(
    State(state): State<AppState>,
    payload: Result<Json<AuthorizerRequest>, JsonRejection>,
) -> Result<Json<AuthorizationDecision>, AppError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection, "unreadable authorizer request");
        AppError::bad_request("INVALID_AUTHORIZER_REQUEST", rejection.body_text())
    })?;

    let decision = state
        .authorizer
        .authorize(req.resource(), &req.headers)
        .await;

    Ok(Json(decision))
}
