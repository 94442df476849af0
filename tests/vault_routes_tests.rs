use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use strongbox::auth::AuthGate;
use strongbox::config::Config;
use strongbox::router::{VaultState, vault_router};
use strongbox::service::{self, VaultHandle, VaultOps};
use tower::ServiceExt;

const KEY: &str = "pwd";

struct TestVault {
    app: Router,
    vault: VaultHandle,
    paths: Vec<PathBuf>,
}

impl Drop for TestVault {
    fn drop(&mut self) {
        self.vault.stop();
        for p in &self.paths {
            let _ = fs::remove_file(p);
            for suffix in ["-wal", "-shm", "-journal", ".tmp"] {
                let mut side = p.as_os_str().to_owned();
                side.push(suffix);
                let _ = fs::remove_file(PathBuf::from(side));
            }
        }
    }
}

async fn spawn_vault(tag: &str) -> TestVault {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let base = std::env::temp_dir();
    let db_path = base.join(format!(
        "strongbox-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    let key_path = base.join(format!(
        "strongbox-{tag}-{}-{}.key",
        std::process::id(),
        nanos
    ));

    let cfg = Config {
        database_url: format!("sqlite:{}", db_path.display()),
        key_file: key_path.clone(),
        master_key: KEY.to_string(),
        ..Config::default()
    };

    let unlocked = AuthGate::new(cfg.master_key.clone())
        .attempt(KEY)
        .expect("gate should unlock with the configured key");
    let ops = VaultOps::open(unlocked, &cfg)
        .await
        .expect("failed to open vault");
    let vault = service::spawn(ops).await.expect("failed to spawn vault");

    let state = VaultState::new(vault.clone(), Arc::from(KEY));
    TestVault {
        app: vault_router(state),
        vault,
        paths: vec![db_path, key_path],
    }
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-vault-key", KEY);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body was not json")
    };
    (status, value)
}

#[tokio::test]
async fn entry_lifecycle_over_http() {
    let tv = spawn_vault("lifecycle").await;
    let app = &tv.app;

    let (status, body) = call(app, "GET", "/count", None).await;
    assert_eq!(status, StatusCode::OK);
    let start = body["count"].as_i64().unwrap();

    let (status, body) = call(
        app,
        "POST",
        "/entries",
        Some(json!({"site": "github.com", "user": "alice", "password": "Ab3#9!2k"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Entry added.");

    let (_, body) = call(app, "GET", "/count", None).await;
    assert_eq!(body["count"].as_i64().unwrap(), start + 1);

    let (status, body) = call(app, "GET", "/entries/github.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], "alice");
    assert_eq!(body["password"], "Ab3#9!2k");

    let (status, body) = call(
        app,
        "PUT",
        "/entries/github.com",
        Some(json!({"password": "Zz9$1!4m"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated.");

    let (_, body) = call(app, "GET", "/entries/github.com", None).await;
    assert_eq!(body["password"], "Zz9$1!4m");

    let (status, body) = call(app, "DELETE", "/entries/github.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Entry deleted.");

    let (status, body) = call(app, "GET", "/entries/github.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, body) = call(app, "GET", "/count", None).await;
    assert_eq!(body["count"].as_i64().unwrap(), start);
}

#[tokio::test]
async fn site_named_count_is_manageable() {
    let tv = spawn_vault("count-site").await;
    let app = &tv.app;

    let (status, _) = call(
        app,
        "POST",
        "/entries",
        Some(json!({"site": "count", "user": "bob", "password": "Ab3#9!2k"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(app, "GET", "/entries/count", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["site"], "count");
    assert_eq!(body["user"], "bob");
    assert_eq!(body["password"], "Ab3#9!2k");

    let (status, body) = call(
        app,
        "PUT",
        "/entries/count",
        Some(json!({"password": "Zz9$1!4m"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated.");

    let (_, body) = call(app, "GET", "/entries/count", None).await;
    assert_eq!(body["password"], "Zz9$1!4m");

    let (_, body) = call(app, "GET", "/count", None).await;
    assert_eq!(body["count"].as_i64().unwrap(), 1);

    let (status, body) = call(app, "DELETE", "/entries/count", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Entry deleted.");

    let (status, _) = call(app, "GET", "/entries/count", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = call(app, "GET", "/count", None).await;
    assert_eq!(body["count"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn missing_entries_and_blank_fields_are_reported() {
    let tv = spawn_vault("notices").await;
    let app = &tv.app;

    let (status, body) = call(
        app,
        "PUT",
        "/entries/nonexistent",
        Some(json!({"password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No entry found.");

    let (status, _) = call(app, "DELETE", "/entries/nonexistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        app,
        "POST",
        "/entries",
        Some(json!({"site": "github.com", "user": "", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "You have left a field blank.");

    let (_, body) = call(app, "GET", "/count", None).await;
    assert_eq!(body["count"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn requests_without_the_key_are_rejected() {
    let tv = spawn_vault("unauthorized").await;

    for (method, uri) in [
        ("GET", "/count"),
        ("GET", "/entries/github.com"),
        ("DELETE", "/entries/github.com"),
        ("GET", "/generate"),
    ] {
        let resp = tv
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("x-vault-key", "wrong")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn generate_returns_fresh_password() {
    let tv = spawn_vault("generate").await;

    let (status, body) = call(&tv.app, "GET", "/generate", None).await;
    assert_eq!(status, StatusCode::OK);
    let pw = body["password"].as_str().unwrap();
    assert_eq!(pw.chars().count(), 12);
}
