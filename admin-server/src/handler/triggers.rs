//! Trigger listing and tagging handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;
use shared::{HostRef, ObjectKind, Tag, Trigger, is_discovered};

use crate::common::{ApiResponse, AppError, AppResult, ok_data};
use crate::core::ServerState;
use crate::handler::tags::{self, BulkPayload, Payload, TagPayload};
use crate::handler::{CountView, Paging};

/// Trigger as presented by the API, with the discovery flag computed
#[derive(Debug, Serialize)]
pub struct TriggerView {
    pub triggerid: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub url: String,
    pub expression: String,
    pub is_discovered: bool,
    pub tags: Vec<Tag>,
    pub hosts: Vec<HostRef>,
}

impl From<Trigger> for TriggerView {
    fn from(t: Trigger) -> Self {
        Self {
            is_discovered: is_discovered(&t.flags),
            triggerid: t.triggerid,
            description: t.description,
            status: t.status,
            priority: t.priority,
            url: t.url,
            expression: t.expression,
            tags: t.tags,
            hosts: t.hosts,
        }
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<Paging>,
) -> AppResult<Json<ApiResponse<Vec<TriggerView>>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let triggers = client
        .get_triggers(page.limit, page.offset)
        .await
        .map_err(AppError::upstream)?;
    Ok(ok_data(triggers.into_iter().map(TriggerView::from).collect()))
}

pub async fn count(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<CountView>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let count = client
        .get_triggers_count()
        .await
        .map_err(AppError::upstream)?;
    Ok(ok_data(CountView { count }))
}

pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<TriggerView>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let trigger = client
        .get_trigger_details(id)
        .await
        .map_err(AppError::upstream)?
        .ok_or_else(|| AppError::NotFound(format!("Trigger {id} not found")))?;
    Ok(ok_data(TriggerView::from(trigger)))
}

pub async fn add_tag(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    payload: Payload<TagPayload>,
) -> AppResult<Json<ApiResponse<()>>> {
    tags::add_tag(state, ObjectKind::Trigger, id, payload).await
}

pub async fn remove_tag(
    State(state): State<ServerState>,
    Path((id, tag_name)): Path<(u64, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    tags::remove_tag(state, ObjectKind::Trigger, id, tag_name).await
}

pub async fn bulk_tags(
    State(state): State<ServerState>,
    payload: Payload<BulkPayload>,
) -> AppResult<Json<ApiResponse<()>>> {
    tags::bulk(state, ObjectKind::Trigger, payload).await
}
