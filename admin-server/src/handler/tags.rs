//! Tag mutation handlers, generic over the object kind
//!
//! The per-kind route modules delegate here; the only difference between
//! tagging a host, a trigger or an item is the [`ObjectKind`] passed in.
//!
//! All input validation happens before the client is built, so a request
//! that fails validation never reaches the remote platform. Logical
//! failures answer HTTP 200 with `success: false`.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use monitor_client::TagOp;
use serde::Deserialize;
use serde_json::Value;
use shared::{ObjectKind, validate_tag_name, validate_tag_value};
use tracing::warn;

use crate::common::{ApiResponse, AppError, AppResult, bulk_outcome, fail, ok_data, ok_message};
use crate::core::ServerState;

/// JSON body extractor that reports rejection as a validation failure
pub type Payload<T> = Result<Json<T>, JsonRejection>;

#[derive(Debug, Deserialize)]
pub struct TagPayload {
    pub tag: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkPayload {
    pub operation: Option<String>,
    /// Ids as numbers or comma-joined strings ("5,6")
    #[serde(default)]
    pub ids: Vec<Value>,
    pub tag: Option<String>,
    pub value: Option<String>,
}

/// GET /api/tags - every distinct tag name in use
pub async fn all_tags(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let tags = client.get_all_tags().await.map_err(AppError::upstream)?;
    Ok(ok_data(tags))
}

/// Add one tag to one object.
pub(crate) async fn add_tag(
    state: ServerState,
    kind: ObjectKind,
    id: u64,
    payload: Payload<TagPayload>,
) -> AppResult<Json<ApiResponse<()>>> {
    let Json(payload) = payload.map_err(reject_non_json)?;

    let name = payload.tag.as_deref().unwrap_or("").trim().to_string();
    validate_tag_name(&name).map_err(|e| AppError::Validation(e.to_string()))?;
    let value = payload.value.unwrap_or_default();
    validate_tag_value(&value).map_err(|e| AppError::Validation(e.to_string()))?;

    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    match client.mutate_tag(kind, id, &TagOp::add(name, value)).await {
        Ok(()) => Ok(ok_message("Tag has been added")),
        Err(e) => {
            warn!(kind = kind.noun(), id, error = %e, "add tag failed");
            Ok(fail("Failed to add tag"))
        }
    }
}

/// Remove one tag from one object. The tag name comes from the path.
pub(crate) async fn remove_tag(
    state: ServerState,
    kind: ObjectKind,
    id: u64,
    tag_name: String,
) -> AppResult<Json<ApiResponse<()>>> {
    let name = tag_name.trim().to_string();
    validate_tag_name(&name).map_err(|e| AppError::Validation(e.to_string()))?;

    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    match client.mutate_tag(kind, id, &TagOp::remove(name)).await {
        Ok(()) => Ok(ok_message("Tag has been removed")),
        Err(e) => {
            warn!(kind = kind.noun(), id, error = %e, "remove tag failed");
            Ok(fail("Failed to remove tag"))
        }
    }
}

/// Apply one tag operation to a whole id selection.
pub(crate) async fn bulk(
    state: ServerState,
    kind: ObjectKind,
    payload: Payload<BulkPayload>,
) -> AppResult<Json<ApiResponse<()>>> {
    let Json(payload) = payload.map_err(reject_non_json)?;

    let name = payload.tag.as_deref().unwrap_or("").trim().to_string();
    validate_tag_name(&name).map_err(|e| AppError::Validation(e.to_string()))?;
    let value = payload.value.unwrap_or_default();
    validate_tag_value(&value).map_err(|e| AppError::Validation(e.to_string()))?;

    if payload.ids.is_empty() {
        return Err(AppError::Validation(format!(
            "No {} selected",
            kind.plural()
        )));
    }
    let ids = parse_id_list(&payload.ids)
        .ok_or_else(|| AppError::Validation(format!("Invalid {} IDs", kind.noun())))?;

    let op = match payload.operation.as_deref() {
        Some("add") => TagOp::add(name, value),
        Some("remove") => TagOp::remove(name),
        _ => return Err(AppError::Validation("Unknown operation".to_string())),
    };

    let mut client = state.client();
    client.authenticate().await.map_err(|_| AppError::Unauthorized)?;

    let report = client
        .bulk_mutate(kind, &ids, &op)
        .await
        .map_err(AppError::upstream)?;

    let verb = match op {
        TagOp::Add { .. } => "added to",
        TagOp::Remove { .. } => "removed from",
    };
    let mut message = format!("Tag {verb} {} {}", report.success, kind.plural());
    if report.failed > 0 {
        message.push_str(&format!(
            " ({} failed - likely discovered/read-only)",
            report.failed
        ));
    }

    Ok(bulk_outcome(message, &report))
}

fn reject_non_json(_: JsonRejection) -> AppError {
    AppError::Validation("Invalid request - JSON required".to_string())
}

/// Parse a raw id selection into integers.
///
/// Each element may be a number or a comma-joined string of numbers (the
/// grouped-item form). Any unparseable sub-token rejects the whole list.
fn parse_id_list(raw: &[Value]) -> Option<Vec<u64>> {
    let mut ids = Vec::new();
    for entry in raw {
        match entry {
            Value::Number(n) => ids.push(n.as_u64()?),
            Value::String(s) => {
                for token in s.split(',') {
                    ids.push(token.trim().parse().ok()?);
                }
            }
            _ => return None,
        }
    }
    Some(ids)
}
