use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::models::{SessionList, SessionResults, SessionStatus},
    extractors::{AuthGuard, JsonBody, PathParam},
    lifecycle::SessionAction,
    rejections::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/quiz/{quiz_id}/sessions", get(list_sessions))
        .route("/admin/quiz/{quiz_id}/session/start", post(start_session))
        .route(
            "/admin/quiz/{quiz_id}/session/{session_id}",
            get(session_status).put(update_session_state),
        )
        .route(
            "/admin/quiz/{quiz_id}/session/{session_id}/results",
            get(session_results),
        )
}

async fn list_sessions(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam(quiz_id): PathParam<i32>,
) -> Result<Json<SessionList>, AppError> {
    Ok(Json(state.db.sessions(user.user_id, quiz_id).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionBody {
    #[serde(default)]
    auto_start_num: i64,
}

async fn start_session(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam(quiz_id): PathParam<i32>,
    JsonBody(body): JsonBody<StartSessionBody>,
) -> Result<Json<Value>, AppError> {
    let session_id = state
        .db
        .start_session(user.user_id, quiz_id, body.auto_start_num)
        .await?;
    Ok(Json(json!({ "sessionId": session_id })))
}

async fn session_status(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam((quiz_id, session_id)): PathParam<(i32, i32)>,
) -> Result<Json<SessionStatus>, AppError> {
    Ok(Json(
        state
            .db
            .session_status(user.user_id, quiz_id, session_id)
            .await?,
    ))
}

#[derive(Deserialize)]
struct ActionBody {
    action: String,
}

async fn update_session_state(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam((quiz_id, session_id)): PathParam<(i32, i32)>,
    JsonBody(body): JsonBody<ActionBody>,
) -> Result<Json<Value>, AppError> {
    let action: SessionAction = body.action.parse()?;
    let new_state = state
        .db
        .update_session_state(user.user_id, quiz_id, session_id, action)
        .await?;
    Ok(Json(json!({ "state": new_state })))
}

async fn session_results(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam((quiz_id, session_id)): PathParam<(i32, i32)>,
) -> Result<Json<SessionResults>, AppError> {
    Ok(Json(
        state
            .db
            .session_results(user.user_id, quiz_id, session_id)
            .await?,
    ))
}
