pub mod account;
pub mod admin;
pub mod player;
pub mod quiz;

use axum::Json;
use serde_json::{json, Value};

/// The `{}` body sent back by operations with nothing to report.
fn empty() -> Json<Value> {
    Json(json!({}))
}
