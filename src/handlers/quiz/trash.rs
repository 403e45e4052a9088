use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    extractors::{AuthGuard, PathParam, QueryParam},
    handlers::empty,
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/quiz/trash", get(view_trash))
        .route("/admin/quiz/trash/empty", delete(empty_trash))
        .route("/admin/quiz/{quiz_id}/restore", post(restore_quiz))
}

async fn view_trash(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let quizzes = state.db.trash(user.user_id).await?;
    Ok(Json(json!({ "quizzes": quizzes })))
}

async fn restore_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    PathParam(quiz_id): PathParam<i32>,
) -> Result<Json<Value>, AppError> {
    state.db.restore_quiz(user.user_id, quiz_id).await?;
    Ok(empty())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmptyTrashQuery {
    /// Comma separated, e.g. `quizIds=1,2`.
    #[serde(default)]
    quiz_ids: String,
}

async fn empty_trash(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    QueryParam(query): QueryParam<EmptyTrashQuery>,
) -> Result<Json<Value>, AppError> {
    let quiz_ids = parse_ids(&query.quiz_ids)?;
    state.db.empty_trash(user.user_id, &quiz_ids).await?;
    Ok(empty())
}

fn parse_ids(raw: &str) -> Result<Vec<i32>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| id.parse::<i32>().reject_input("invalid quiz id"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_from_a_comma_list() {
        assert_eq!(parse_ids("1,2, 3").unwrap(), vec![1, 2, 3]);
        assert!(parse_ids("").unwrap().is_empty());
        assert!(parse_ids("1,x").is_err());
    }
}
