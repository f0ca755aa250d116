#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use smarthome_api::config::AppConfig;
use smarthome_api::database::{apply_migrations, Database};
use smarthome_api::{app, AppState};

pub const PASSWORD: &str = "correct-horse";

/// Router over a fresh in-memory store, driven with `oneshot`.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Session token from the `Set-Cookie` header, `Some("")` when cleared.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == "smarthome_session")
            .map(|(_, value)| value.to_string())
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_config(AppConfig::development()).await
    }

    pub async fn with_config(mut config: AppConfig) -> Result<Self> {
        config.api.enable_request_logging = false;
        let db = Database::connect_in_memory().await?;
        apply_migrations(db.pool()).await?;
        let state = AppState::new(config, db)?;
        let router = app(state.clone());
        Ok(Self { state, router })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(TestResponse { status, headers, body })
    }

    /// GET with the session cookie when `token` is given.
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(build(Method::GET, path, token, None)?).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(build(Method::POST, path, token, Some(body))?).await
    }

    /// Register `email` and return its session token.
    pub async fn register(&self, email: &str) -> Result<String> {
        let res = self
            .post(
                "/register",
                None,
                json!({
                    "email": email,
                    "first_name": "Ada",
                    "password": PASSWORD,
                    "confirm_password": PASSWORD,
                }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "registration failed: {}", res.body);
        res.session_cookie().context("registration did not set a session cookie")
    }

    /// Create a room on `floor` and return its id.
    pub async fn create_room(&self, token: &str, floor: u8, room_type: &str, devices: &[&str]) -> Result<i64> {
        let res = self
            .post(
                &format!("/createpage{}", floor),
                Some(token),
                json!({ "type_of_room": room_type, "devices": devices }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "room creation failed: {}", res.body);
        res.data()["room_id"].as_i64().context("room_id missing")
    }

    pub async fn count(&self, table: &str) -> Result<i64> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(self.state.db.pool())
            .await?;
        Ok(count)
    }
}

fn build(method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("smarthome_session={}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(request)
}

/// The built `smarthome-api` binary on a private port and database file.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
    _data_dir: tempfile::TempDir,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let data_dir = tempfile::tempdir().context("failed to create data dir")?;
        let database_url = format!("sqlite://{}", data_dir.path().join("smart_home.db").display());

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_smarthome-api"));
        cmd.env("APP_ENV", "development")
            .env("SMARTHOME_API_PORT", port.to_string())
            .env("DATABASE_URL", database_url)
            .env("SECURITY_SESSION_SECRET", "integration-test-secret")
            .env_remove("AUTOMATION_HOOK_COMMAND")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
            _data_dir: data_dir,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawn a server for one test; it is killed when the handle drops.
pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(20)).await?;
    Ok(server)
}
