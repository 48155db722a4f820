//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the demo handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and shut down gracefully

use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{AppConfig, FilesConfig};
use crate::http::attachment::Attachment;
use crate::http::error::ResponseResult;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::ResponseBuilder;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub files: Arc<FilesConfig>,
}

/// HTTP server serving the demo routes.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let state = AppState {
            files: Arc::new(config.files.clone()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/files/{*name}", get(download))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            files_root = %self.config.files.root,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct ServiceInfo {
    service: &'static str,
    version: &'static str,
}

async fn index() -> ResponseResult<ResponseBuilder> {
    let mut res = ResponseBuilder::new();
    res.set_media(&ServiceInfo {
        service: "micro-web",
        version: env!("CARGO_PKG_VERSION"),
    })?;
    Ok(res)
}

#[derive(Debug, Deserialize)]
struct DownloadParams {
    inline: Option<bool>,
}

/// Attach a file below the configured root.
async fn download(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<DownloadParams>,
) -> ResponseResult<ResponseBuilder> {
    let mut res = ResponseBuilder::new();

    let Some(relative) = relative_file_path(&name) else {
        tracing::warn!(name = %name, "Rejected attachment path");
        res.set_status(StatusCode::BAD_REQUEST);
        res.set_media(&serde_json::json!({ "error": "invalid file name" }))?;
        return Ok(res);
    };

    let inline = params.inline.unwrap_or(state.files.inline_by_default);
    let path = FsPath::new(&state.files.root).join(relative);
    res.attach(Attachment::file(path).inline(inline)).await?;
    Ok(res)
}

/// Keep only plain components, so the result stays below the files root.
fn relative_file_path(name: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in FsPath::new(name).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}
