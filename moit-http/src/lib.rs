//! MOIT HTTP API Server
//!
//! This crate provides the JSON API for the MOIT hobby-meetup platform:
//! accounts, meetings, posts, contacts, uploads and the survey-driven hobby
//! recommendations delegated to the external AI agent.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;
pub mod session;

use server::{ServerConfig, start_server};

/// Start the MOIT HTTP server with the default configuration
pub async fn start() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    start_server(ServerConfig::default()).await
}

/// Start the MOIT HTTP server with a custom configuration
pub async fn start_with_config(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    start_server(config).await
}
