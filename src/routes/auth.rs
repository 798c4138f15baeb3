// SPDX-License-Identifier: MIT

//! Authentication routes: email/password accounts and Google federated
//! sign-in, both delegated to the identity provider. On success a
//! first-party session JWT is set as an HttpOnly cookie.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser, SESSION_COOKIE};
use crate::models::{Member, MemberRole, MemberStatus};
use crate::services::IdentityUser;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/google", get(google_start))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/logout", post(logout))
}

/// Routes that require a session (applied behind the auth middleware).
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

// ─── Session Responses ───────────────────────────────────────

/// Session principal response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Whether the admin policy grants this principal admin affordances
    pub admin: bool,
}

/// Current principal from the session token.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(SessionResponse {
        admin: state.admin_policy.is_admin(&user),
        uid: user.uid,
        email: user.email,
        display_name: user.display_name,
    }))
}

// ─── Email / Password ────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

/// Create an account with the identity provider, then create the member
/// document and start a session.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let account = state
        .identity
        .sign_up(&payload.email, &payload.password)
        .await?;

    let display_name = format!("{} {}", payload.first_name, payload.last_name)
        .trim()
        .to_string();
    if !display_name.is_empty() {
        state
            .identity
            .update_display_name(&account.id_token, &display_name)
            .await?;
    }

    // Member document keyed by the auth uid, default role.
    let member = Member {
        id: account.local_id.clone(),
        name: display_name.clone(),
        email: account.email.clone(),
        phone: None,
        membership_plan: None,
        status: MemberStatus::Active,
        join_date: Utc::now(),
        role: Some(MemberRole::Member),
    };
    state.db.upsert_member(&account.local_id, &member).await?;

    tracing::info!(uid = %account.local_id, "Signup successful");

    start_session(&state, jar, &account, Some(display_name))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Verify credentials with the identity provider and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let account = state
        .identity
        .sign_in_with_password(&payload.email, &payload.password)
        .await?;

    tracing::info!(uid = %account.local_id, "Login successful");

    let display_name = account.display_name.clone();
    start_session(&state, jar, &account, display_name)
}

/// Mint the session JWT and attach the cookie.
fn start_session(
    state: &Arc<AppState>,
    jar: CookieJar,
    account: &IdentityUser,
    display_name: Option<String>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let jwt = create_jwt(
        &account.local_id,
        &account.email,
        display_name.as_deref(),
        &state.config.jwt_signing_key,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let principal = AuthUser {
        uid: account.local_id.clone(),
        email: account.email.clone(),
        display_name: display_name.clone(),
    };

    let response = SessionResponse {
        admin: state.admin_policy.is_admin(&principal),
        uid: account.local_id.clone(),
        email: account.email.clone(),
        display_name,
    };

    Ok((jar.add(session_cookie(state, jwt)), Json(response)))
}

/// Session cookie with attributes matched by the removal cookie on logout.
fn session_cookie(state: &Arc<AppState>, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30))
        .build();
    if state.config.frontend_url.starts_with("https://") {
        cookie.set_secure(true);
    }
    cookie
}

/// Logout - clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut removal = session_cookie(&state, String::new());
    removal.set_max_age(time::Duration::ZERO);
    (jar.add(removal), StatusCode::NO_CONTENT)
}

// ─── Google Federated Sign-in ────────────────────────────────

/// Query parameters for starting the OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after OAuth completes.
    /// If not provided, uses the configured frontend URL.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start OAuth flow - redirect to Google consent.
async fn google_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: axum::http::HeaderMap,
) -> Result<Redirect> {
    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    // Encode frontend URL + timestamp in state
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    let state_payload = format!("{}|{:x}", frontend_url, timestamp);
    let oauth_state = sign_state(&state_payload, &state.config.oauth_state_key)?;

    let callback_url = callback_url(&headers);

    let auth_url = format!(
        "https://accounts.google.com/o/oauth2/v2/auth?\
         client_id={}&\
         redirect_uri={}&\
         response_type=code&\
         scope=openid%20email%20profile&\
         state={}",
        state.identity.client_id(),
        urlencoding::encode(&callback_url),
        oauth_state
    );

    tracing::info!(frontend_url = %frontend_url, "Starting Google OAuth flow");

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange the code, sign in with the provider, ensure a
/// member document exists, and start a session.
async fn google_callback(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    // Decode and verify frontend URL from state parameter
    let frontend_url = verify_and_decode_state(&params.state, &state.config.oauth_state_key)
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    // Check for OAuth errors (user denied consent, etc.)
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        let redirect = format!("{}?error={}", frontend_url, urlencoding::encode(&error));
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let callback_url = callback_url(&headers);

    let tokens = state
        .identity
        .exchange_google_code(&code, &callback_url)
        .await?;

    let account = state
        .identity
        .sign_in_with_idp(&tokens.id_token, &callback_url)
        .await?;

    tracing::info!(uid = %account.local_id, "Google sign-in successful");

    // Create the member document on first sign-in; merge semantics mean an
    // existing profile is never overwritten.
    if state.db.get_member(&account.local_id).await?.is_none() {
        let member = Member {
            id: account.local_id.clone(),
            name: account.display_name.clone().unwrap_or_default(),
            email: account.email.clone(),
            phone: None,
            membership_plan: None,
            status: MemberStatus::Active,
            join_date: Utc::now(),
            role: Some(MemberRole::Member),
        };
        state.db.upsert_member(&account.local_id, &member).await?;
    }

    let jwt = create_jwt(
        &account.local_id,
        &account.email,
        account.display_name.as_deref(),
        &state.config.jwt_signing_key,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok((
        jar.add(session_cookie(&state, jwt)),
        Redirect::temporary(&frontend_url),
    ))
}

/// Callback URL derived from the request host; localhost stays on http.
fn callback_url(headers: &axum::http::HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            std::env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string())
        });

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/auth/google/callback", scheme, host)
}

/// Sign the state payload and base64-encode `payload|signature_hex`.
fn sign_state(payload: &str, secret: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed_state = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed_state.as_bytes()))
}

/// Verify HMAC signature and decode the frontend URL from the OAuth state
/// parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let frontend_url = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    // Reconstruct payload and verify signature
    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        let secret = b"secret_key";
        let payload = "https://example.com|1a2b3c";

        let encoded = sign_state(payload, secret).unwrap();
        let result = verify_and_decode_state(&encoded, secret);

        assert_eq!(result, Some("https://example.com".to_string()));
    }

    #[test]
    fn test_state_invalid_signature() {
        let secret = b"secret_key";
        let state_data = "https://example.com|1a2b3c|deadbeef";
        let encoded = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        assert_eq!(verify_and_decode_state(&encoded, secret), None);
    }

    #[test]
    fn test_state_wrong_secret() {
        let encoded = sign_state("https://example.com|1a2b3c", b"secret_key").unwrap();
        assert_eq!(verify_and_decode_state(&encoded, b"wrong_key"), None);
    }

    #[test]
    fn test_state_malformed() {
        let secret = b"secret_key";
        let encoded = URL_SAFE_NO_PAD.encode("invalid|format");
        assert_eq!(verify_and_decode_state(&encoded, secret), None);
    }

    #[test]
    fn test_signup_password_length() {
        let payload = SignupRequest {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "t@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(payload.validate().is_err());

        let payload = SignupRequest {
            password: "longenough".to_string(),
            ..payload
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_signup_email_format() {
        let payload = SignupRequest {
            first_name: String::new(),
            last_name: String::new(),
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
        };
        assert!(payload.validate().is_err());
    }
}
