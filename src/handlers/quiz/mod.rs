mod crud;
mod question;
mod session;
mod trash;

use axum::Router;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(crud::routes())
        .merge(question::routes())
        .merge(trash::routes())
        .merge(session::routes())
}
