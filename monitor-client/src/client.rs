//! MonitorClient — JSON-RPC client for the remote monitoring platform
//!
//! One instance per inbound request; the only state carried between
//! calls is the session token. All calls are sequential awaits.

use serde_json::{Value, json};
use shared::{Host, Item, ObjectKind, Trigger};

use crate::config::{ClientConfig, Credentials};
use crate::error::{ClientError, ClientResult};
use crate::rpc::{LOGIN_METHOD, RpcRequest, RpcResponse, looks_like_auth_error};

/// JSON-RPC client with bearer-token authentication
#[derive(Debug)]
pub struct MonitorClient {
    http: reqwest::Client,
    config: ClientConfig,
    token: Option<String>,
}

impl MonitorClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("monitor-tag-admin")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            config,
            token: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current bearer token, if authenticated
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Authenticate against the remote platform.
    ///
    /// A static API token is adopted directly with no remote round-trip.
    /// Username/password credentials go through the login method. Fails
    /// closed when no credential source is configured.
    pub async fn authenticate(&mut self) -> ClientResult<()> {
        match self.config.credentials.clone() {
            Some(Credentials::ApiToken(token)) => {
                tracing::debug!("using static API token, skipping login");
                self.token = Some(token);
                Ok(())
            }
            Some(Credentials::Password { username, password }) => {
                let params = json!({ "username": username, "password": password });
                let resp = self.dispatch(LOGIN_METHOD, params).await?;
                match (resp.result, resp.error) {
                    (Some(Value::String(token)), _) => {
                        self.token = Some(token);
                        Ok(())
                    }
                    (Some(other), _) => Err(ClientError::InvalidResponse(format!(
                        "login returned non-string token: {other}"
                    ))),
                    (None, Some(err)) => {
                        tracing::error!(error = %err.detail(), "login rejected");
                        Err(ClientError::Auth(err.detail().to_string()))
                    }
                    (None, None) => Err(ClientError::InvalidResponse(
                        "login response carried neither result nor error".to_string(),
                    )),
                }
            }
            None => {
                tracing::error!("no API token or username/password configured");
                Err(ClientError::Auth(
                    "No API token or username/password configured".to_string(),
                ))
            }
        }
    }

    /// Execute a JSON-RPC method and return its `result` value.
    ///
    /// Authenticates lazily on first use. When the remote reports an
    /// authentication/session error and the credentials are
    /// username/password, the stored token is cleared and the call is
    /// retried exactly once after re-login; static-token failures are
    /// terminal. Transport errors are terminal.
    pub async fn call(&mut self, method: &str, params: Value) -> ClientResult<Value> {
        if method != LOGIN_METHOD && self.token.is_none() {
            self.authenticate().await?;
        }

        let mut retried = false;
        loop {
            let resp = self.dispatch(method, params.clone()).await?;

            if let Some(result) = resp.result {
                return Ok(result);
            }

            let err = resp.error.ok_or_else(|| {
                ClientError::InvalidResponse(
                    "response carried neither result nor error".to_string(),
                )
            })?;
            let detail = err.detail().to_string();
            tracing::warn!(method, error = %detail, "API error");

            if !retried && method != LOGIN_METHOD && looks_like_auth_error(&detail) {
                match self.config.credentials {
                    Some(Credentials::Password { .. }) => {
                        // Session expired: re-login once, then retry the call
                        self.token = None;
                        self.authenticate().await?;
                        retried = true;
                        continue;
                    }
                    Some(Credentials::ApiToken(_)) => {
                        tracing::error!(
                            "API token authentication failed; check that the token is valid and not expired"
                        );
                        return Err(ClientError::Auth(detail));
                    }
                    None => return Err(ClientError::Auth(detail)),
                }
            }

            return Err(ClientError::Api(detail));
        }
    }

    /// Single HTTP round-trip. The bearer token goes in the
    /// `Authorization` header for every method except login; it is never
    /// embedded in the request body.
    async fn dispatch(&self, method: &str, params: Value) -> ClientResult<RpcResponse> {
        let payload = RpcRequest::new(method, params);
        let mut req = self.http.post(&self.config.url).json(&payload);

        if method != LOGIN_METHOD {
            if let Some(token) = &self.token {
                req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        let resp = req.send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }

    // ========== Typed fetches ==========

    /// Fetch hosts with tags, sorted by name ascending.
    pub async fn get_hosts(
        &mut self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> ClientResult<Vec<Host>> {
        let mut params = json!({
            "output": ["hostid", "host", "name", "status", "flags"],
            "selectTags": "extend",
            "sortfield": "name",
            "sortorder": "ASC",
        });
        apply_page(&mut params, limit, offset);

        let result = self.call("host.get", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Fetch triggers with tags and owning hosts, sorted by description.
    pub async fn get_triggers(
        &mut self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> ClientResult<Vec<Trigger>> {
        let mut params = json!({
            "output": ["triggerid", "description", "status", "priority", "url", "expression", "flags"],
            "selectTags": "extend",
            "selectHosts": ["hostid", "name"],
            "sortfield": "description",
            "sortorder": "ASC",
            "expandDescription": true,
        });
        apply_page(&mut params, limit, offset);

        let result = self.call("trigger.get", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Fetch monitored items with tags and owning hosts, sorted by name.
    pub async fn get_items(
        &mut self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> ClientResult<Vec<Item>> {
        let mut params = json!({
            "output": ["itemid", "name", "key_", "type", "status", "value_type", "delay", "flags"],
            "selectTags": "extend",
            "selectHosts": ["hostid", "name"],
            "sortfield": "name",
            "sortorder": "ASC",
            "monitored": true,
        });
        apply_page(&mut params, limit, offset);

        let result = self.call("item.get", params).await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn get_hosts_count(&mut self) -> ClientResult<u64> {
        let result = self.call("host.get", json!({ "countOutput": true })).await?;
        parse_count(result)
    }

    pub async fn get_triggers_count(&mut self) -> ClientResult<u64> {
        let result = self
            .call("trigger.get", json!({ "countOutput": true }))
            .await?;
        parse_count(result)
    }

    /// Count of monitored items (same implicit filter as the listing).
    pub async fn get_items_count(&mut self) -> ClientResult<u64> {
        let result = self
            .call("item.get", json!({ "countOutput": true, "monitored": true }))
            .await?;
        parse_count(result)
    }

    /// Fetch one host with tags; `Ok(None)` if it does not exist.
    pub async fn get_host_details(&mut self, host_id: u64) -> ClientResult<Option<Host>> {
        let params = json!({
            "output": ["hostid", "host", "name", "status", "flags"],
            "selectTags": "extend",
            "hostids": [host_id],
        });
        let result = self.call("host.get", params).await?;
        first_of(result)
    }

    /// Fetch one trigger with tags and hosts; `Ok(None)` if absent.
    pub async fn get_trigger_details(&mut self, trigger_id: u64) -> ClientResult<Option<Trigger>> {
        let params = json!({
            "output": ["triggerid", "description", "status", "priority", "url", "expression", "flags"],
            "selectTags": "extend",
            "selectHosts": ["hostid", "name"],
            "triggerids": [trigger_id],
            "expandDescription": true,
        });
        let result = self.call("trigger.get", params).await?;
        first_of(result)
    }

    /// Fetch one item with tags and hosts; `Ok(None)` if absent.
    pub async fn get_item_details(&mut self, item_id: u64) -> ClientResult<Option<Item>> {
        let params = json!({
            "output": ["itemid", "name", "key_", "type", "status", "value_type", "delay", "units", "description", "flags"],
            "selectTags": "extend",
            "selectHosts": ["hostid", "name"],
            "itemids": [item_id],
        });
        let result = self.call("item.get", params).await?;
        first_of(result)
    }

    /// Fetch one object of any kind as a raw record (tags selected).
    ///
    /// Used by the generic tag mutation path, which only needs the tag
    /// list and the display name.
    pub(crate) async fn fetch_object(
        &mut self,
        kind: ObjectKind,
        id: u64,
    ) -> ClientResult<Option<Value>> {
        let spec = kind.spec();
        let mut params = serde_json::Map::new();
        params.insert(
            "output".to_string(),
            json!([spec.id_field, spec.name_field]),
        );
        params.insert("selectTags".to_string(), json!("extend"));
        params.insert(format!("{}s", spec.id_field), json!([id]));

        let result = self.call(spec.get_method, Value::Object(params)).await?;
        match result {
            Value::Array(mut objects) if !objects.is_empty() => Ok(Some(objects.remove(0))),
            Value::Array(_) => Ok(None),
            other => Err(ClientError::InvalidResponse(format!(
                "{} returned non-array result: {other}",
                spec.get_method
            ))),
        }
    }
}

fn apply_page(params: &mut Value, limit: Option<u64>, offset: Option<u64>) {
    if let Some(map) = params.as_object_mut() {
        if let Some(limit) = limit {
            map.insert("limit".to_string(), json!(limit));
        }
        if let Some(offset) = offset {
            map.insert("offset".to_string(), json!(offset));
        }
    }
}

/// Count queries come back as a decimal string (older platform versions
/// send a bare number).
fn parse_count(result: Value) -> ClientResult<u64> {
    match result {
        Value::String(s) => s
            .parse()
            .map_err(|_| ClientError::InvalidResponse(format!("bad count: {s:?}"))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ClientError::InvalidResponse(format!("bad count: {n}"))),
        other => Err(ClientError::InvalidResponse(format!(
            "bad count result: {other}"
        ))),
    }
}

fn first_of<T: serde::de::DeserializeOwned>(result: Value) -> ClientResult<Option<T>> {
    match result {
        Value::Array(mut objects) if !objects.is_empty() => {
            Ok(Some(serde_json::from_value(objects.remove(0))?))
        }
        Value::Array(_) => Ok(None),
        other => Err(ClientError::InvalidResponse(format!(
            "expected array result, got: {other}"
        ))),
    }
}
