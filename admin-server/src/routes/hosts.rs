//! Host Routes

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;
use crate::handler::hosts;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/hosts", get(hosts::list))
        .route("/api/hosts/count", get(hosts::count))
        .route("/api/host/{id}", get(hosts::detail))
        .route("/api/host/{id}/tags", post(hosts::add_tag))
        .route("/api/host/{id}/tags/{tag_name}", delete(hosts::remove_tag))
        .route("/api/hosts/tags/bulk", post(hosts::bulk_tags))
}
