//! Integration tests for MonitorClient against an in-process JSON-RPC stub
//!
//! The stub is a plain axum router on an ephemeral port that records
//! every method call together with the Authorization header it arrived
//! with, so the tests can assert exactly which remote calls were made.

use std::sync::{Arc, Mutex};

use axum::http::{HeaderMap, header};
use axum::{Json, Router, extract::State, routing::post};
use serde_json::{Value, json};

use monitor_client::{ClientConfig, Credentials, MonitorClient, TagOp};
use shared::ObjectKind;

type Responder = dyn Fn(&str, &Value, Option<&str>) -> Value + Send + Sync;

#[derive(Clone)]
struct Stub {
    responder: Arc<Responder>,
    /// (method, authorization header) per call, in order
    calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl Stub {
    fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|(m, _)| m == method).count()
    }
}

async fn rpc(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let method = body["method"].as_str().unwrap_or_default().to_string();
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.calls.lock().unwrap().push((method.clone(), auth.clone()));

    let params = body.get("params").cloned().unwrap_or(Value::Null);
    Json((stub.responder)(&method, &params, auth.as_deref()))
}

async fn spawn_stub<F>(responder: F) -> (String, Stub)
where
    F: Fn(&str, &Value, Option<&str>) -> Value + Send + Sync + 'static,
{
    let stub = Stub {
        responder: Arc::new(responder),
        calls: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new().route("/", post(rpc)).with_state(stub.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), stub)
}

fn ok(result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "result": result, "id": 1 })
}

fn session_error() -> Value {
    json!({
        "jsonrpc": "2.0",
        "error": {
            "code": -32602,
            "message": "Invalid params.",
            "data": "Session terminated, re-login, please."
        },
        "id": 1
    })
}

fn host_record(hostid: &str, tags: Value) -> Value {
    json!({ "hostid": hostid, "host": "web-01", "name": "Web server 01", "tags": tags })
}

#[tokio::test]
async fn static_token_goes_out_as_bearer_without_login() {
    let (url, stub) = spawn_stub(|method, _, _| match method {
        "host.get" => ok(json!([])),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("TOKEN".to_string()));
    let mut client = MonitorClient::new(config);
    client.get_hosts(None, None).await.unwrap();

    assert_eq!(
        stub.calls(),
        vec![("host.get".to_string(), Some("Bearer TOKEN".to_string()))]
    );
}

#[tokio::test]
async fn password_credentials_login_then_attach_session_token() {
    let (url, stub) = spawn_stub(|method, _, _| match method {
        "user.login" => ok(json!("sess-1")),
        "host.get" => ok(json!([])),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(
        url,
        Credentials::Password {
            username: "admin".to_string(),
            password: "secret".to_string(),
        },
    );
    let mut client = MonitorClient::new(config);
    client.get_hosts(None, None).await.unwrap();

    assert_eq!(
        stub.calls(),
        vec![
            ("user.login".to_string(), None),
            ("host.get".to_string(), Some("Bearer sess-1".to_string())),
        ]
    );
}

#[tokio::test]
async fn expired_session_triggers_exactly_one_relogin_and_retry() {
    let login_seq = Arc::new(Mutex::new(0u32));
    let seq = login_seq.clone();
    let (url, stub) = spawn_stub(move |method, _, auth| match method {
        "user.login" => {
            let mut n = seq.lock().unwrap();
            *n += 1;
            ok(json!(format!("sess-{n}")))
        }
        "host.get" => {
            // First session is already expired; the second works.
            if auth == Some("Bearer sess-1") {
                session_error()
            } else {
                ok(json!([]))
            }
        }
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(
        url,
        Credentials::Password {
            username: "admin".to_string(),
            password: "secret".to_string(),
        },
    );
    let mut client = MonitorClient::new(config);
    client.get_hosts(None, None).await.unwrap();

    let methods: Vec<String> = stub.calls().into_iter().map(|(m, _)| m).collect();
    assert_eq!(methods, ["user.login", "host.get", "user.login", "host.get"]);
}

#[tokio::test]
async fn persistent_auth_failure_stops_after_second_attempt() {
    let (url, stub) = spawn_stub(|method, _, _| match method {
        "user.login" => ok(json!("sess-x")),
        "host.get" => session_error(),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(
        url,
        Credentials::Password {
            username: "admin".to_string(),
            password: "secret".to_string(),
        },
    );
    let mut client = MonitorClient::new(config);
    assert!(client.get_hosts(None, None).await.is_err());

    // one original attempt + one retry, no third
    assert_eq!(stub.count("host.get"), 2);
    assert_eq!(stub.count("user.login"), 2);
}

#[tokio::test]
async fn static_token_auth_failure_is_never_retried() {
    let (url, stub) = spawn_stub(|method, _, _| match method {
        "host.get" => session_error(),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("stale".to_string()));
    let mut client = MonitorClient::new(config);
    assert!(client.get_hosts(None, None).await.is_err());

    assert_eq!(stub.count("host.get"), 1);
    assert_eq!(stub.count("user.login"), 0);
}

#[tokio::test]
async fn missing_credentials_fail_closed_without_remote_call() {
    let (url, stub) = spawn_stub(|_, _, _| panic!("no call expected")).await;

    let config = ClientConfig {
        url,
        credentials: None,
        bulk_limit: 1000,
    };
    let mut client = MonitorClient::new(config);
    assert!(client.authenticate().await.is_err());
    assert!(client.get_hosts(None, None).await.is_err());
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn add_tag_pushes_full_list_with_automatic_stripped() {
    let update_params = Arc::new(Mutex::new(None::<Value>));
    let captured = update_params.clone();
    let (url, _stub) = spawn_stub(move |method, params, _| match method {
        "host.get" => ok(json!([host_record(
            "10084",
            json!([{ "tag": "env", "value": "prod", "automatic": "1" }]),
        )])),
        "host.update" => {
            *captured.lock().unwrap() = Some(params.clone());
            ok(json!({ "hostids": ["10084"] }))
        }
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);
    client
        .mutate_tag(ObjectKind::Host, 10084, &TagOp::add("team", "sre"))
        .await
        .unwrap();

    let params = update_params.lock().unwrap().clone().unwrap();
    assert_eq!(params["hostid"], 10084);
    assert_eq!(
        params["tags"],
        json!([
            { "tag": "env", "value": "prod" },
            { "tag": "team", "value": "sre" },
        ])
    );
}

#[tokio::test]
async fn duplicate_add_is_idempotent_success_without_write() {
    let (url, stub) = spawn_stub(|method, _, _| match method {
        "host.get" => ok(json!([host_record(
            "10084",
            json!([{ "tag": "env", "value": "prod" }]),
        )])),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);
    client
        .mutate_tag(ObjectKind::Host, 10084, &TagOp::add("env", "staging"))
        .await
        .unwrap();

    assert_eq!(stub.count("host.update"), 0);
}

#[tokio::test]
async fn remove_missing_tag_is_idempotent_success_without_write() {
    let (url, stub) = spawn_stub(|method, _, _| match method {
        "host.get" => ok(json!([host_record(
            "10084",
            json!([{ "tag": "env", "value": "prod" }]),
        )])),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);
    client
        .mutate_tag(ObjectKind::Host, 10084, &TagOp::remove("nope"))
        .await
        .unwrap();

    assert_eq!(stub.count("host.update"), 0);
}

#[tokio::test]
async fn remove_existing_tag_pushes_filtered_list() {
    let update_params = Arc::new(Mutex::new(None::<Value>));
    let captured = update_params.clone();
    let (url, _stub) = spawn_stub(move |method, params, _| match method {
        "host.get" => ok(json!([host_record(
            "10084",
            json!([
                { "tag": "env", "value": "prod", "automatic": "0" },
                { "tag": "team", "value": "sre" },
            ]),
        )])),
        "host.update" => {
            *captured.lock().unwrap() = Some(params.clone());
            ok(json!({ "hostids": ["10084"] }))
        }
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);
    client
        .mutate_tag(ObjectKind::Host, 10084, &TagOp::remove("env"))
        .await
        .unwrap();

    let params = update_params.lock().unwrap().clone().unwrap();
    assert_eq!(params["tags"], json!([{ "tag": "team", "value": "sre" }]));
}

#[tokio::test]
async fn mutating_a_missing_object_fails_without_write() {
    let (url, stub) = spawn_stub(|method, _, _| match method {
        "trigger.get" => ok(json!([])),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);
    let err = client
        .mutate_tag(ObjectKind::Trigger, 99, &TagOp::add("env", ""))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not found"), "got: {err}");
    assert_eq!(stub.count("trigger.update"), 0);
}

#[tokio::test]
async fn invalid_tag_input_is_rejected_before_any_remote_call() {
    let (url, stub) = spawn_stub(|_, _, _| panic!("no call expected")).await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);

    assert!(
        client
            .mutate_tag(ObjectKind::Host, 1, &TagOp::add("   ", "v"))
            .await
            .is_err()
    );
    assert!(
        client
            .mutate_tag(ObjectKind::Host, 0, &TagOp::add("env", "v"))
            .await
            .is_err()
    );
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn bulk_accounts_per_id_and_never_aborts_early() {
    let (url, _stub) = spawn_stub(|method, params, _| match method {
        "trigger.get" => {
            let id = params["triggerids"][0].as_u64().unwrap();
            if id == 2 {
                ok(json!([])) // missing object fails that id only
            } else {
                ok(json!([{ "triggerid": id.to_string(), "description": "t", "tags": [] }]))
            }
        }
        "trigger.update" => ok(json!({ "triggerids": [] })),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);
    let report = client
        .bulk_mutate(ObjectKind::Trigger, &[1, 2, 2, 3], &TagOp::add("env", "prod"))
        .await
        .unwrap();

    assert_eq!(report.success, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.errors, vec![2]);
    assert_eq!(report.processed(), 3); // 4 ids, duplicate collapsed
}

#[tokio::test]
async fn bulk_truncates_at_the_ceiling_without_error() {
    let (url, stub) = spawn_stub(|method, params, _| match method {
        "host.get" => {
            let id = params["hostids"][0].as_u64().unwrap();
            ok(json!([{ "hostid": id.to_string(), "name": "h", "tags": [] }]))
        }
        "host.update" => ok(json!({ "hostids": [] })),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config =
        ClientConfig::new(url, Credentials::ApiToken("T".to_string())).with_bulk_limit(1000);
    let mut client = MonitorClient::new(config);

    let ids: Vec<u64> = (1..=1200).collect();
    let report = client
        .bulk_mutate(ObjectKind::Host, &ids, &TagOp::add("env", "prod"))
        .await
        .unwrap();

    assert_eq!(report.processed(), 1000);
    assert_eq!(report.success + report.failed, 1000);
    assert_eq!(stub.count("host.get"), 1000);
}

#[tokio::test]
async fn counts_parse_the_remote_string_form() {
    let (url, _stub) = spawn_stub(|method, params, _| match method {
        "host.get" => {
            assert_eq!(params["countOutput"], json!(true));
            ok(json!("42"))
        }
        "item.get" => {
            assert_eq!(params["monitored"], json!(true));
            ok(json!("7"))
        }
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);
    assert_eq!(client.get_hosts_count().await.unwrap(), 42);
    assert_eq!(client.get_items_count().await.unwrap(), 7);
}

#[tokio::test]
async fn all_tags_are_distinct_and_sorted() {
    let (url, _stub) = spawn_stub(|method, _, _| match method {
        "host.get" => ok(json!([
            host_record("1", json!([{ "tag": "env", "value": "prod" }, { "tag": "team", "value": "" }])),
            host_record("2", json!([{ "tag": "env", "value": "dev" }, { "tag": "app", "value": "" }])),
        ])),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);
    let tags = client.get_all_tags().await.unwrap();
    assert_eq!(tags, vec!["app", "env", "team"]);
}

#[tokio::test]
async fn tag_search_sends_the_filter_with_and_without_value() {
    let filters = Arc::new(Mutex::new(Vec::<Value>::new()));
    let captured = filters.clone();
    let (url, _stub) = spawn_stub(move |method, params, _| match method {
        "host.get" => {
            captured.lock().unwrap().push(params["tags"].clone());
            ok(json!([]))
        }
        other => panic!("unexpected method {other}"),
    })
    .await;

    let config = ClientConfig::new(url, Credentials::ApiToken("T".to_string()));
    let mut client = MonitorClient::new(config);
    client.search_hosts_by_tag("env", Some("prod")).await.unwrap();
    client.search_hosts_by_tag("env", None).await.unwrap();

    let filters = filters.lock().unwrap();
    assert_eq!(filters[0], json!([{ "tag": "env", "value": "prod" }]));
    assert_eq!(filters[1], json!([{ "tag": "env" }]));
}

#[tokio::test]
async fn transport_failure_is_terminal() {
    // Nothing is listening on this port.
    let config = ClientConfig::new(
        "http://127.0.0.1:1/".to_string(),
        Credentials::ApiToken("T".to_string()),
    );
    let mut client = MonitorClient::new(config);
    assert!(client.get_hosts(None, None).await.is_err());
}
