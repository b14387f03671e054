//! Trigger Routes

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;
use crate::handler::triggers;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/triggers", get(triggers::list))
        .route("/api/triggers/count", get(triggers::count))
        .route("/api/trigger/{id}", get(triggers::detail))
        .route("/api/trigger/{id}/tags", post(triggers::add_tag))
        .route(
            "/api/trigger/{id}/tags/{tag_name}",
            delete(triggers::remove_tag),
        )
        .route("/api/triggers/tags/bulk", post(triggers::bulk_tags))
}
