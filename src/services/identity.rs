// SPDX-License-Identifier: MIT

//! Google Identity Toolkit client for account operations.
//!
//! Handles:
//! - Email/password sign-up and sign-in
//! - Federated sign-in with a Google OAuth credential
//! - Display name updates after sign-up
//!
//! Session lifecycle is not handled here; routes mint first-party JWTs once
//! the provider verifies the credentials.

use crate::error::AppError;
use serde::Deserialize;

const IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Identity Toolkit API client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    api_key: String,
    client_id: String,
    client_secret: String,
}

impl IdentityClient {
    /// Create a new client with the web API key and OAuth credentials.
    pub fn new(api_key: String, client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: IDENTITY_BASE_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            api_key,
            client_id,
            client_secret,
        }
    }

    /// Override endpoints, for tests against a local stub server.
    pub fn with_base_urls(mut self, base_url: String, token_url: String) -> Self {
        self.base_url = base_url;
        self.token_url = token_url;
        self
    }

    /// Create a new account with email and password.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityUser, AppError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        self.post_json("accounts:signUp", &body).await
    }

    /// Verify an email/password credential.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityUser, AppError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        self.post_json("accounts:signInWithPassword", &body).await
    }

    /// Sign in with a Google OAuth credential (federated login).
    pub async fn sign_in_with_idp(
        &self,
        google_id_token: &str,
        request_uri: &str,
    ) -> Result<IdentityUser, AppError> {
        let body = serde_json::json!({
            "postBody": format!("id_token={}&providerId=google.com", google_id_token),
            "requestUri": request_uri,
            "returnSecureToken": true,
        });
        self.post_json("accounts:signInWithIdp", &body).await
    }

    /// Set the display name on a freshly created account.
    pub async fn update_display_name(
        &self,
        id_token: &str,
        display_name: &str,
    ) -> Result<(), AppError> {
        let body = serde_json::json!({
            "idToken": id_token,
            "displayName": display_name,
            "returnSecureToken": false,
        });
        let _: serde_json::Value = self.post_json("accounts:update", &body).await?;
        Ok(())
    }

    /// Exchange a Google OAuth authorization code for tokens.
    ///
    /// The id_token in the response is what `sign_in_with_idp` consumes.
    pub async fn exchange_google_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleTokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::AuthApi(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AuthApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthApi(format!("JSON parse error: {}", e)))
    }

    /// OAuth client ID, needed when building the consent URL.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// POST to an Identity Toolkit endpoint and parse the JSON response.
    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::AuthApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AuthApi(extract_error_message(status, &body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthApi(format!("JSON parse error: {}", e)))
    }
}

/// Pull the provider's error code (e.g. `EMAIL_EXISTS`, `INVALID_PASSWORD`)
/// out of the error envelope, falling back to the raw body.
fn extract_error_message(status: reqwest::StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => format!("HTTP {}: {}", status, body),
    }
}

/// Account record returned by Identity Toolkit sign-up/sign-in calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    /// Provider uid
    pub local_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Short-lived provider token, used for follow-up profile updates
    pub id_token: String,
}

/// Google OAuth token exchange response.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub id_token: String,
}
