// SPDX-License-Identifier: MIT

use gymflow::config::Config;
use gymflow::db::FirestoreDb;
use gymflow::policy::AdminPolicy;
use gymflow::routes::create_router;
use gymflow::services::{IdentityClient, InsightsClient};
use gymflow::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Create a test app with a custom config (offline mock database).
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let db = test_db_offline();
    build_app(config, db)
}

/// Create a test app against the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    build_app(Config::test_default(), test_db().await)
}

fn build_app(config: Config, db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let identity = IdentityClient::new(
        config.identity_api_key.clone(),
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
    );
    // No Gemini key: every insights call errors and degrades to fallback.
    let insights = InsightsClient::new(config.insights_model.clone(), config.gemini_api_key.clone());
    let admin_policy = AdminPolicy::new(config.admin_email.clone());

    let state = Arc::new(AppState {
        config,
        db,
        identity,
        insights,
        admin_policy,
    });

    (create_router(state.clone()), state)
}

/// Create a test session JWT for the given principal.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str, email: &str, signing_key: &[u8]) -> String {
    gymflow::middleware::auth::create_jwt(uid, email, None, signing_key)
        .expect("JWT creation should not fail")
}

/// JWT for the configured admin principal.
#[allow(dead_code)]
pub fn create_admin_jwt(state: &Arc<AppState>) -> String {
    create_test_jwt(
        "admin-uid",
        &state.config.admin_email,
        &state.config.jwt_signing_key,
    )
}

/// JWT for a regular (non-admin) member.
#[allow(dead_code)]
pub fn create_member_jwt(state: &Arc<AppState>) -> String {
    create_test_jwt(
        "member-uid",
        "member@example.com",
        &state.config.jwt_signing_key,
    )
}
