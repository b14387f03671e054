//! Tag Routes

use axum::{Router, routing::get};

use crate::core::ServerState;
use crate::handler::tags;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/tags", get(tags::all_tags))
}
