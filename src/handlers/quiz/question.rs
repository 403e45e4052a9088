use axum::{
    extract::State,
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::models::QuestionBody,
    extractors::{AuthGuard, JsonBody, PathParam},
    handlers::empty,
    rejections::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/quiz/{quiz_id}/question", post(create_question))
        .route(
            "/admin/quiz/{quiz_id}/question/{question_id}",
            put(update_question).delete(delete_question),
        )
        .route(
            "/admin/quiz/{quiz_id}/question/{question_id}/move",
            put(move_question),
        )
        .route(
            "/admin/quiz/{quiz_id}/question/{question_id}/duplicate",
            post(duplicate_question),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload {
    question_body: QuestionBody,
}

async fn create_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam(quiz_id): PathParam<i32>,
    JsonBody(body): JsonBody<QuestionPayload>,
) -> Result<Json<Value>, AppError> {
    let question_id = state
        .db
        .create_question(user.user_id, quiz_id, &body.question_body)
        .await?;
    Ok(Json(json!({ "questionId": question_id })))
}

async fn update_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam((quiz_id, question_id)): PathParam<(i32, i32)>,
    JsonBody(body): JsonBody<QuestionPayload>,
) -> Result<Json<Value>, AppError> {
    state
        .db
        .update_question(user.user_id, quiz_id, question_id, &body.question_body)
        .await?;
    Ok(empty())
}

async fn delete_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam((quiz_id, question_id)): PathParam<(i32, i32)>,
) -> Result<Json<Value>, AppError> {
    state
        .db
        .delete_question(user.user_id, quiz_id, question_id)
        .await?;
    Ok(empty())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody {
    new_position: i64,
}

async fn move_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam((quiz_id, question_id)): PathParam<(i32, i32)>,
    JsonBody(body): JsonBody<MoveBody>,
) -> Result<Json<Value>, AppError> {
    state
        .db
        .move_question(user.user_id, quiz_id, question_id, body.new_position)
        .await?;
    Ok(empty())
}

async fn duplicate_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam((quiz_id, question_id)): PathParam<(i32, i32)>,
) -> Result<Json<Value>, AppError> {
    let new_question_id = state
        .db
        .duplicate_question(user.user_id, quiz_id, question_id)
        .await?;
    Ok(Json(json!({ "newQuestionId": new_question_id })))
}
