//! Horis Inference API
//!
//! REST API and CLI for predicting the finishing order of horse races.

mod cli;
mod config;
mod error;
mod features;
mod model;
mod predictor;
mod routes;
mod storage;
mod types;

use axum::{routing::get, routing::post, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::model::create_shared_model;
use crate::predictor::Predictor;
use crate::routes::AppState;
use crate::storage::HorseRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => run_server(Some(host), Some(port)).await,
        Commands::Predict {
            input,
            format,
            model,
            database,
        } => cli::run_predict(input, format, model, database).await,
        Commands::Import { input, database } => cli::run_import(input, database).await,
    }
}

/// Run the API server.
async fn run_server(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horis_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = AppConfig::load()?;

    // Override with CLI args
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("Model path: {}", config.model.path);
    tracing::info!("Database path: {}", config.database.path);

    // Open the horse store
    let horses = Arc::new(HorseRepository::open(Path::new(&config.database.path))?);
    tracing::info!("Horse store opened ({} horses)", horses.horse_count().unwrap_or(0));

    // Load model; a missing or unreadable artifact keeps the service down
    tracing::info!("Loading ONNX model...");
    let model = create_shared_model(&config.model.path)?;
    tracing::info!("Model loaded successfully");

    // Create application state
    let predictor = Predictor::new(model, horses.clone());
    let state = Arc::new(AppState {
        predictor,
        horses,
        config: config.clone(),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/model/info", get(routes::model_info))
        .route("/predict", post(routes::predict))
        .route("/horses.json", get(routes::complete_horses))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
