use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use moit_core::agent::AgentClient;
use moit_core::config::Config;
use moit_core::objects::{FsObjectStore, ObjectStore};
use moit_core::storage::Storage;

use crate::auth::auth_middleware;
use crate::routes::create_api_router;
use crate::session::SessionManager;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub sessions: SessionManager,
    pub agent: Arc<AgentClient>,
    pub objects: Arc<dyn ObjectStore>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Core configuration (database, agent, uploads)
    pub core: Config,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            core: Config::from_env(),
        }
    }
}

/// Wire up storage, the object store and the agent client.
pub async fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let storage = Storage::connect(&config.db_path).await?;
    let objects = FsObjectStore::new(&config.upload_root, config.public_upload_url.as_str())?;
    let agent = AgentClient::new(config.agent_url.as_str())?;

    Ok(AppState {
        storage: Arc::new(storage),
        sessions: SessionManager::new(),
        agent: Arc::new(agent),
        objects: Arc::new(objects),
    })
}

/// Build the full application router: API routes, uploaded-object serving,
/// session middleware, tracing and CORS.
pub fn app(state: AppState, upload_root: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_api_router()
        .with_state(state.clone())
        .nest_service("/uploads", ServeDir::new(upload_root))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config.core).await?;
    info!("initialized state");

    let app = app(state, &config.core.upload_root);

    // Parse the socket address
    let addr = format!("{}:{}", config.host, config.port).parse::<SocketAddr>()?;

    // Start the server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
