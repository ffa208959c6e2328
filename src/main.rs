// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Threadnest API Server
//!
//! Serves the user-profile and social-graph data-access operations of a
//! threaded-discussion application over Firestore.

use std::sync::Arc;
use threadnest::{
    config::Config,
    db::FirestoreDb,
    services::{Revalidator, UserService},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Threadnest API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Revalidation policy comes from configuration
    let revalidator = Revalidator::new(config.revalidate_paths.clone());
    tracing::info!(
        routes = ?config.revalidate_paths,
        "Revalidation policy loaded"
    );

    let users = UserService::new(db.clone(), revalidator.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        users,
        revalidator,
    });

    // Build router
    let app = threadnest::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("threadnest=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
