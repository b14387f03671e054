//! Item listing, grouping and tagging handlers
//!
//! The same item key usually exists on many hosts (template-driven), so
//! the listing groups raw items by `key_` and presents one row per key
//! with the union of hosts and tags. Tag operations then target the
//! combined id list of a group.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;
use shared::{HostRef, Item, ObjectKind, Tag, TagWrite, is_discovered};

use crate::common::{ApiResponse, AppError, AppResult, ok_data};
use crate::core::ServerState;
use crate::handler::tags::{self, BulkPayload, Payload, TagPayload};
use crate::handler::{CountView, Paging};

/// One listing row: all items sharing a `key_`
#[derive(Debug, Serialize)]
pub struct ItemGroup {
    pub key_: String,
    pub name: String,
    /// Ids of every item in the group, wire form (decimal strings)
    pub item_ids: Vec<String>,
    pub hosts: Vec<HostRef>,
    pub host_count: usize,
    /// Distinct `(tag, value)` pairs across the group, sorted
    pub tags: Vec<TagWrite>,
    pub has_discovered: bool,
}

/// Single item as presented by the detail endpoint
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub itemid: String,
    pub name: String,
    pub key_: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub status: String,
    pub value_type: String,
    pub delay: String,
    pub units: String,
    pub description: String,
    pub is_discovered: bool,
    pub tags: Vec<Tag>,
    pub hosts: Vec<HostRef>,
}

impl From<Item> for ItemView {
    fn from(i: Item) -> Self {
        Self {
            is_discovered: is_discovered(&i.flags),
            itemid: i.itemid,
            name: i.name,
            key_: i.key_,
            item_type: i.item_type,
            status: i.status,
            value_type: i.value_type,
            delay: i.delay,
            units: i.units,
            description: i.description,
            tags: i.tags,
            hosts: i.hosts,
        }
    }
}

/// Group raw items by key, preserving the remote sort order of first
/// appearance. Hosts are deduplicated by id and sorted by name
/// case-insensitively; tags are distinct `(tag, value)` pairs, sorted.
fn group_items(items: Vec<Item>) -> Vec<ItemGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, ItemGroup> = HashMap::new();

    for item in items {
        let group = match groups.entry(item.key_.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                order.push(item.key_.clone());
                e.insert(ItemGroup {
                    key_: item.key_.clone(),
                    name: item.name.clone(),
                    item_ids: Vec::new(),
                    hosts: Vec::new(),
                    host_count: 0,
                    tags: Vec::new(),
                    has_discovered: false,
                })
            }
        };

        group.item_ids.push(item.itemid);
        if is_discovered(&item.flags) {
            group.has_discovered = true;
        }
        for host in item.hosts {
            if !group.hosts.iter().any(|h| h.hostid == host.hostid) {
                group.hosts.push(host);
            }
        }
        for tag in &item.tags {
            let pair = TagWrite::from(tag);
            if !group.tags.contains(&pair) {
                group.tags.push(pair);
            }
        }
    }

    let mut out: Vec<ItemGroup> = order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .collect();
    for group in &mut out {
        group
            .hosts
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        group
            .tags
            .sort_by(|a, b| (&a.tag, &a.value).cmp(&(&b.tag, &b.value)));
        group.host_count = group.hosts.len();
    }
    out
}

pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<Paging>,
) -> AppResult<Json<ApiResponse<Vec<ItemGroup>>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let items = client
        .get_items(page.limit, page.offset)
        .await
        .map_err(AppError::upstream)?;
    Ok(ok_data(group_items(items)))
}

pub async fn count(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<CountView>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let count = client.get_items_count().await.map_err(AppError::upstream)?;
    Ok(ok_data(CountView { count }))
}

pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<ItemView>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let item = client
        .get_item_details(id)
        .await
        .map_err(AppError::upstream)?
        .ok_or_else(|| AppError::NotFound(format!("Item {id} not found")))?;
    Ok(ok_data(ItemView::from(item)))
}

pub async fn add_tag(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    payload: Payload<TagPayload>,
) -> AppResult<Json<ApiResponse<()>>> {
    tags::add_tag(state, ObjectKind::Item, id, payload).await
}

pub async fn remove_tag(
    State(state): State<ServerState>,
    Path((id, tag_name)): Path<(u64, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    tags::remove_tag(state, ObjectKind::Item, id, tag_name).await
}

pub async fn bulk_tags(
    State(state): State<ServerState>,
    payload: Payload<BulkPayload>,
) -> AppResult<Json<ApiResponse<()>>> {
    tags::bulk(state, ObjectKind::Item, payload).await
}
