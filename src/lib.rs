pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod lifecycle;
pub mod names;
pub mod rejections;
pub mod services;
pub mod utils;
pub mod validate;

use axum::Router;
use tower_http::trace::TraceLayer;

use services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(db: db::Db) -> Self {
        Self {
            auth: AuthService::new(db.clone()),
            db,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::admin::routes())
        .merge(handlers::account::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::player::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
