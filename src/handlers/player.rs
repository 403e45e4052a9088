use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::models::{PlayerStatus, QuestionResult, QuestionView, SessionResults},
    extractors::{JsonBody, PathParam},
    handlers::empty,
    rejections::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/player/join", post(join))
        .route("/player/{player_id}", get(status))
        .route("/player/{player_id}/question/{position}", get(question))
        .route(
            "/player/{player_id}/question/{position}/answer",
            put(submit_answer),
        )
        .route(
            "/player/{player_id}/question/{position}/results",
            get(question_results),
        )
        .route("/player/{player_id}/results", get(results))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinBody {
    session_id: i32,
    #[serde(default)]
    name: String,
}

async fn join(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<JoinBody>,
) -> Result<Json<Value>, AppError> {
    let player_id = state.db.join_session(body.session_id, &body.name).await?;
    Ok(Json(json!({ "playerId": player_id })))
}

async fn status(
    State(state): State<AppState>,
    PathParam(player_id): PathParam<i32>,
) -> Result<Json<PlayerStatus>, AppError> {
    Ok(Json(state.db.player_status(player_id).await?))
}

async fn question(
    State(state): State<AppState>,
    PathParam((player_id, position)): PathParam<(i32, u32)>,
) -> Result<Json<QuestionView>, AppError> {
    Ok(Json(state.db.player_question(player_id, position).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerBody {
    answer_ids: Vec<i32>,
}

async fn submit_answer(
    State(state): State<AppState>,
    PathParam((player_id, position)): PathParam<(i32, u32)>,
    JsonBody(body): JsonBody<AnswerBody>,
) -> Result<Json<Value>, AppError> {
    state
        .db
        .submit_answer(player_id, position, &body.answer_ids)
        .await?;
    Ok(empty())
}

async fn question_results(
    State(state): State<AppState>,
    PathParam((player_id, position)): PathParam<(i32, u32)>,
) -> Result<Json<QuestionResult>, AppError> {
    Ok(Json(
        state
            .db
            .player_question_results(player_id, position)
            .await?,
    ))
}

async fn results(
    State(state): State<AppState>,
    PathParam(player_id): PathParam<i32>,
) -> Result<Json<SessionResults>, AppError> {
    Ok(Json(state.db.player_results(player_id).await?))
}
