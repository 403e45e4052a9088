use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    extractors::{AuthGuard, JsonBody},
    rejections::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/auth/register", post(register))
        .route("/admin/auth/login", post(login))
        .route("/admin/auth/logout", post(logout))
        .route("/admin/user/details", get(details))
        .route("/admin/user/password", put(update_password))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody {
    email: String,
    password: String,
    name_first: String,
    name_last: String,
}

async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterBody>,
) -> Result<Json<Value>, AppError> {
    let token = state
        .auth
        .register(&body.email, &body.password, &body.name_first, &body.name_last)
        .await?;
    Ok(Json(json!({ "token": token })))
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<Value>, AppError> {
    let token = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(json!({ "token": token })))
}

async fn logout(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    state.auth.logout(&user.token).await?;
    Ok(super::empty())
}

async fn details(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let details = state.auth.user_details(user.user_id).await?;
    Ok(Json(json!({ "user": details })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePasswordBody {
    old_password: String,
    new_password: String,
}

async fn update_password(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdatePasswordBody>,
) -> Result<Json<Value>, AppError> {
    state
        .auth
        .update_password(user.user_id, &body.old_password, &body.new_password)
        .await?;
    Ok(super::empty())
}
