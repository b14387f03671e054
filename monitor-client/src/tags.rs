//! Tag mutation: single-object and bulk
//!
//! The mutation path is the same for every object kind: fetch the
//! current record, compute the new tag list as a value (no in-place
//! mutation), strip the read-only `automatic` field, and push the full
//! list back through the kind's update method.
//!
//! The remote write replaces the entire tag list. There is no optimistic
//! locking, so a concurrent external edit between fetch and write is
//! lost; preventing that is out of scope.

use serde_json::{Value, json};
use shared::{BulkReport, ObjectKind, Tag, TagWrite, validate_tag_name, validate_tag_value};

use crate::client::MonitorClient;
use crate::error::{ClientError, ClientResult};

/// A single tag operation, applied to one object or a whole id set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOp {
    Add { name: String, value: String },
    Remove { name: String },
}

impl TagOp {
    pub fn add(name: impl Into<String>, value: impl Into<String>) -> Self {
        TagOp::Add {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn remove(name: impl Into<String>) -> Self {
        TagOp::Remove { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            TagOp::Add { name, .. } => name,
            TagOp::Remove { name } => name,
        }
    }

    /// Validate the operation's inputs against the remote limits.
    pub fn validate(&self) -> ClientResult<()> {
        match self {
            TagOp::Add { name, value } => {
                validate_tag_name(name)
                    .and(validate_tag_value(value))
                    .map_err(|e| ClientError::Validation(e.to_string()))
            }
            TagOp::Remove { name } => {
                validate_tag_name(name).map_err(|e| ClientError::Validation(e.to_string()))
            }
        }
    }
}

impl MonitorClient {
    /// Apply one tag operation to one object.
    ///
    /// Adding a tag whose name is already present, or removing one that
    /// is absent, is an idempotent no-op reported as success; no remote
    /// write is issued in either case.
    pub async fn mutate_tag(
        &mut self,
        kind: ObjectKind,
        id: u64,
        op: &TagOp,
    ) -> ClientResult<()> {
        op.validate()?;
        if id == 0 {
            return Err(ClientError::Validation(format!(
                "Invalid {} id: 0",
                kind.noun()
            )));
        }

        let spec = kind.spec();
        let object = self
            .fetch_object(kind, id)
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("{} {id} not found", kind.noun())))?;

        let current: Vec<Tag> = match object.get("tags") {
            Some(tags) => serde_json::from_value(tags.clone())?,
            None => Vec::new(),
        };
        let display_name = object
            .get(spec.name_field)
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        let new_tags: Vec<TagWrite> = match op {
            TagOp::Add { name, value } => {
                if current.iter().any(|t| t.tag == *name) {
                    tracing::debug!(
                        kind = kind.noun(),
                        id,
                        tag = %name,
                        "tag already present, nothing to do"
                    );
                    return Ok(());
                }
                current
                    .iter()
                    .map(TagWrite::from)
                    .chain(std::iter::once(TagWrite {
                        tag: name.clone(),
                        value: value.clone(),
                    }))
                    .collect()
            }
            TagOp::Remove { name } => {
                let kept: Vec<TagWrite> = current
                    .iter()
                    .filter(|t| t.tag != *name)
                    .map(TagWrite::from)
                    .collect();
                if kept.len() == current.len() {
                    tracing::debug!(
                        kind = kind.noun(),
                        id,
                        tag = %name,
                        "tag not present, nothing to do"
                    );
                    return Ok(());
                }
                kept
            }
        };

        tracing::debug!(
            kind = kind.noun(),
            id,
            name = %display_name,
            tag = %op.name(),
            tag_count = new_tags.len(),
            "pushing updated tag list"
        );

        let mut params = serde_json::Map::new();
        params.insert(spec.id_field.to_string(), json!(id));
        params.insert("tags".to_string(), serde_json::to_value(&new_tags)?);

        self.call(spec.update_method, Value::Object(params)).await?;
        Ok(())
    }

    /// Apply one tag operation across a set of object ids.
    ///
    /// Ids are de-duplicated (first occurrence wins) and truncated at
    /// the configured ceiling; truncation is logged, not an error. Each
    /// id is processed sequentially and one failure never stops the
    /// remaining ids.
    pub async fn bulk_mutate(
        &mut self,
        kind: ObjectKind,
        ids: &[u64],
        op: &TagOp,
    ) -> ClientResult<BulkReport> {
        op.validate()?;

        let ids = dedup_and_cap(ids, self.config().bulk_limit);

        let mut report = BulkReport::default();
        for id in ids {
            match self.mutate_tag(kind, id, op).await {
                Ok(()) => report.record_success(),
                Err(e) => {
                    tracing::debug!(kind = kind.noun(), id, error = %e, "bulk step failed");
                    report.record_failure(id);
                }
            }
        }
        Ok(report)
    }

    /// Every distinct tag name in use across all hosts, sorted.
    pub async fn get_all_tags(&mut self) -> ClientResult<Vec<String>> {
        let hosts = self.get_hosts(None, None).await?;
        let names: std::collections::BTreeSet<String> = hosts
            .into_iter()
            .flat_map(|h| h.tags)
            .map(|t| t.tag)
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Hosts carrying a tag, optionally narrowed to a value.
    pub async fn search_hosts_by_tag(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> ClientResult<Vec<shared::Host>> {
        let params = json!({
            "output": ["hostid", "host", "name", "status", "flags"],
            "selectTags": "extend",
            "tags": [tag_filter(name, value)],
        });
        let result = self.call("host.get", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Triggers carrying a tag, optionally narrowed to a value.
    pub async fn search_triggers_by_tag(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> ClientResult<Vec<shared::Trigger>> {
        let params = json!({
            "output": ["triggerid", "description", "status", "priority", "flags"],
            "selectTags": "extend",
            "selectHosts": ["hostid", "name"],
            "tags": [tag_filter(name, value)],
            "expandDescription": true,
        });
        let result = self.call("trigger.get", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Monitored items carrying a tag, optionally narrowed to a value.
    pub async fn search_items_by_tag(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> ClientResult<Vec<shared::Item>> {
        let params = json!({
            "output": ["itemid", "name", "key_", "type", "status", "flags"],
            "selectTags": "extend",
            "selectHosts": ["hostid", "name"],
            "tags": [tag_filter(name, value)],
            "monitored": true,
        });
        let result = self.call("item.get", params).await?;
        Ok(serde_json::from_value(result)?)
    }
}

fn tag_filter(name: &str, value: Option<&str>) -> Value {
    match value {
        Some(value) => json!({ "tag": name, "value": value }),
        None => json!({ "tag": name }),
    }
}

/// De-duplicate ids preserving first-seen order and truncate at `cap`.
fn dedup_and_cap(ids: &[u64], cap: usize) -> Vec<u64> {
    let mut seen = std::collections::HashSet::new();
    let mut out: Vec<u64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
    if out.len() > cap {
        tracing::warn!(
            requested = out.len(),
            cap,
            "bulk operation truncated to the configured ceiling"
        );
        out.truncate(cap);
    }
    out
}
