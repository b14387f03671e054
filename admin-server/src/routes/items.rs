//! Item Routes

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;
use crate::handler::items;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/items", get(items::list))
        .route("/api/items/count", get(items::count))
        .route("/api/item/{id}", get(items::detail))
        .route("/api/item/{id}/tags", post(items::add_tag))
        .route("/api/item/{id}/tags/{tag_name}", delete(items::remove_tag))
        .route("/api/items/tags/bulk", post(items::bulk_tags))
}
