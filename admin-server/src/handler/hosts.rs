//! Host listing and tagging handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;
use shared::{Host, ObjectKind, Tag, is_discovered};

use crate::common::{ApiResponse, AppError, AppResult, ok_data};
use crate::core::ServerState;
use crate::handler::tags::{self, BulkPayload, Payload, TagPayload};
use crate::handler::{CountView, Paging};

/// Host as presented by the API, with the discovery flag computed
#[derive(Debug, Serialize)]
pub struct HostView {
    pub hostid: String,
    pub host: String,
    pub name: String,
    pub status: String,
    pub is_discovered: bool,
    pub tags: Vec<Tag>,
}

impl From<Host> for HostView {
    fn from(h: Host) -> Self {
        Self {
            is_discovered: is_discovered(&h.flags),
            hostid: h.hostid,
            host: h.host,
            name: h.name,
            status: h.status,
            tags: h.tags,
        }
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<Paging>,
) -> AppResult<Json<ApiResponse<Vec<HostView>>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let hosts = client
        .get_hosts(page.limit, page.offset)
        .await
        .map_err(AppError::upstream)?;
    Ok(ok_data(hosts.into_iter().map(HostView::from).collect()))
}

pub async fn count(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<CountView>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let count = client.get_hosts_count().await.map_err(AppError::upstream)?;
    Ok(ok_data(CountView { count }))
}

pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<HostView>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let host = client
        .get_host_details(id)
        .await
        .map_err(AppError::upstream)?
        .ok_or_else(|| AppError::NotFound(format!("Host {id} not found")))?;
    Ok(ok_data(HostView::from(host)))
}

pub async fn add_tag(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    payload: Payload<TagPayload>,
) -> AppResult<Json<ApiResponse<()>>> {
    tags::add_tag(state, ObjectKind::Host, id, payload).await
}

pub async fn remove_tag(
    State(state): State<ServerState>,
    Path((id, tag_name)): Path<(u64, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    tags::remove_tag(state, ObjectKind::Host, id, tag_name).await
}

pub async fn bulk_tags(
    State(state): State<ServerState>,
    payload: Payload<BulkPayload>,
) -> AppResult<Json<ApiResponse<()>>> {
    tags::bulk(state, ObjectKind::Host, payload).await
}
