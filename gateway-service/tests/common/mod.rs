#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use gateway_service::config::{GatewayConfig, StorageConfig, UpstreamConfig};
use gateway_service::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use uuid::Uuid;

pub fn sample_users(n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| json!({ "id": i, "name": format!("User {}", i), "username": format!("user{}", i) }))
        .collect()
}

/// Posts `1..=n`, with user ids cycling through 1, 2, 3.
pub fn sample_posts(n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| {
            json!({
                "userId": (i - 1) % 3 + 1,
                "id": i,
                "title": format!("title {}", i),
                "body": format!("body {}", i)
            })
        })
        .collect()
}

#[derive(Clone, Default)]
struct StubData {
    users: Arc<RwLock<Vec<Value>>>,
    posts: Arc<RwLock<Vec<Value>>>,
    failing: bool,
}

/// In-process stand-in for the remote users/posts service.
pub struct StubUpstream {
    pub base_url: String,
    data: StubData,
}

impl StubUpstream {
    pub async fn spawn(users: Vec<Value>, posts: Vec<Value>) -> Self {
        Self::start(StubData {
            users: Arc::new(RwLock::new(users)),
            posts: Arc::new(RwLock::new(posts)),
            failing: false,
        })
        .await
    }

    /// Every route answers 500.
    pub async fn spawn_failing() -> Self {
        Self::start(StubData {
            failing: true,
            ..StubData::default()
        })
        .await
    }

    pub async fn set_posts(&self, posts: Vec<Value>) {
        *self.data.posts.write().await = posts;
    }

    async fn start(data: StubData) -> Self {
        let app = Router::new()
            .route("/users", get(stub_users))
            .route("/users/:id", get(stub_user))
            .route("/posts", get(stub_posts))
            .with_state(data.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub upstream");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        StubUpstream {
            base_url: format!("http://127.0.0.1:{}", port),
            data,
        }
    }
}

async fn stub_users(State(data): State<StubData>) -> impl IntoResponse {
    if data.failing {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(data.users.read().await.clone()).into_response()
}

async fn stub_user(State(data): State<StubData>, Path(id): Path<String>) -> impl IntoResponse {
    if data.failing {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let users = data.users.read().await;
    match users.iter().find(|u| u["id"].to_string() == id) {
        Some(user) => Json(user.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn stub_posts(State(data): State<StubData>) -> impl IntoResponse {
    if data.failing {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(data.posts.read().await.clone()).into_response()
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub storage_root: PathBuf,
    pub upload_dir: PathBuf,
    pub posts_file: PathBuf,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(upstream_base_url: &str) -> Self {
        let storage_root = PathBuf::from(format!("target/test-storage-{}", Uuid::new_v4()));

        let config = GatewayConfig {
            common: CoreConfig {
                port: 0, // Random port for testing
                ..CoreConfig::default()
            },
            upstream: UpstreamConfig {
                base_url: upstream_base_url.to_string(),
            },
            storage: StorageConfig {
                upload_dir: storage_root.join("public").join("images"),
                posts_file: storage_root.join("data.json"),
                max_upload_bytes: 1024 * 1024,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let upload_dir = app.state().storage.destination().to_path_buf();
        let posts_file = app.state().posts.path().to_path_buf();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            storage_root,
            upload_dir,
            posts_file,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, path: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Cleanup test storage (uploads and posts file).
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.storage_root).await;
    }
}
