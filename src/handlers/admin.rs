use axum::{extract::State, routing::delete, Json, Router};
use serde_json::Value;

use crate::{rejections::AppError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/clear", delete(clear))
}

/// Wipes every user, quiz, session and player.
async fn clear(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.db.clear().await?;
    Ok(super::empty())
}
