// SPDX-License-Identifier: MIT

//! GymFlow API Server
//!
//! Serves the gym dashboard backend: members, class schedule, attendance,
//! and AI-generated business insights.

use gymflow::{
    config::Config,
    db::FirestoreDb,
    policy::AdminPolicy,
    services::{IdentityClient, InsightsClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting GymFlow API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Identity Toolkit client (sign-up, sign-in, federated login)
    let identity = IdentityClient::new(
        config.identity_api_key.clone(),
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );

    // Gemini client for dashboard insights; degrades to fallback text when
    // no API key is configured
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set, insights will use fallback text");
    }
    let insights = InsightsClient::new(config.insights_model.clone(), config.gemini_api_key.clone());

    let admin_policy = AdminPolicy::new(config.admin_email.clone());
    tracing::info!(admin_email = %config.admin_email, "Admin policy configured");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        identity,
        insights,
        admin_policy,
    });

    // Build router
    let app = gymflow::routes::create_router(state);

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
                .add_directive("gymflow=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
