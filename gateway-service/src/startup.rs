use crate::config::GatewayConfig;
use crate::handlers;
use crate::services::{LocalStorage, PostsStore, Storage, UpstreamClient};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub upstream: Arc<UpstreamClient>,
    pub storage: Arc<dyn Storage>,
    pub posts: PostsStore,
}

impl AppState {
    /// Builds the upstream client and stores from configuration; the upload
    /// directory is created here.
    pub async fn from_config(config: GatewayConfig) -> Result<Self, AppError> {
        let upstream = Arc::new(UpstreamClient::new(&config.upstream.base_url)?);

        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.upload_dir)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize upload directory at {}: {}",
                        config.storage.upload_dir.display(),
                        e
                    );
                    e
                })?,
        );

        let posts = PostsStore::new(&config.storage.posts_file);

        Ok(Self {
            config,
            upstream,
            storage,
            posts,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.storage.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/users", get(handlers::list_users))
        .route("/users/:id/posts", get(handlers::get_user_posts))
        .route(
            "/files",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/posts",
            post(handlers::create_posts).get(handlers::list_posts),
        )
        .route("/posts/:postId", get(handlers::get_post))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        Self::build_with_shutdown(config, std::future::pending()).await
    }

    /// Like [`Application::build`], but stops serving once `shutdown` resolves.
    pub async fn build_with_shutdown<F>(config: GatewayConfig, shutdown: F) -> Result<Self, AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let state = AppState::from_config(config).await?;
        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            upstream = %state.upstream.base_url(),
            upload_dir = %state.config.storage.upload_dir.display(),
            posts_file = %state.posts.path().display(),
            "Listening"
        );

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
