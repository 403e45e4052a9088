use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::models::QuizInfo,
    extractors::{AuthGuard, JsonBody, PathParam},
    handlers::empty,
    rejections::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/quiz/list", get(list_quizzes))
        .route("/admin/quiz", post(create_quiz))
        .route("/admin/quiz/{quiz_id}", get(quiz_info).delete(remove_quiz))
        .route("/admin/quiz/{quiz_id}/name", put(rename_quiz))
        .route("/admin/quiz/{quiz_id}/description", put(update_description))
        .route("/admin/quiz/{quiz_id}/transfer", post(transfer_quiz))
}

async fn list_quizzes(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let quizzes = state.db.quizzes(user.user_id).await?;
    Ok(Json(json!({ "quizzes": quizzes })))
}

#[derive(Deserialize)]
struct CreateQuizBody {
    name: String,
    #[serde(default)]
    description: String,
}

async fn create_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateQuizBody>,
) -> Result<Json<Value>, AppError> {
    let quiz_id = state
        .db
        .create_quiz(user.user_id, &body.name, &body.description)
        .await?;
    Ok(Json(json!({ "quizId": quiz_id })))
}

async fn quiz_info(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam(quiz_id): PathParam<i32>,
) -> Result<Json<QuizInfo>, AppError> {
    Ok(Json(state.db.quiz_info(user.user_id, quiz_id).await?))
}

async fn remove_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam(quiz_id): PathParam<i32>,
) -> Result<Json<Value>, AppError> {
    state.db.remove_quiz(user.user_id, quiz_id).await?;
    Ok(empty())
}

#[derive(Deserialize)]
struct RenameBody {
    name: String,
}

async fn rename_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam(quiz_id): PathParam<i32>,
    JsonBody(body): JsonBody<RenameBody>,
) -> Result<Json<Value>, AppError> {
    state
        .db
        .rename_quiz(user.user_id, quiz_id, &body.name)
        .await?;
    Ok(empty())
}

#[derive(Deserialize)]
struct DescriptionBody {
    description: String,
}

async fn update_description(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam(quiz_id): PathParam<i32>,
    JsonBody(body): JsonBody<DescriptionBody>,
) -> Result<Json<Value>, AppError> {
    state
        .db
        .update_quiz_description(user.user_id, quiz_id, &body.description)
        .await?;
    Ok(empty())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferBody {
    user_email: String,
}

async fn transfer_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam(quiz_id): PathParam<i32>,
    JsonBody(body): JsonBody<TransferBody>,
) -> Result<Json<Value>, AppError> {
    state
        .db
        .transfer_quiz(user.user_id, quiz_id, body.user_email.trim())
        .await?;
    Ok(empty())
}
