// SPDX-License-Identifier: MIT

//! Gemini client for dashboard insights.
//!
//! One fixed prompt, one structured response. The caller serializes the
//! aggregate series, we ask the model for a trends summary and an
//! attendance forecast, constrained to a two-field JSON object. Failures
//! are returned to the caller, which degrades to static fallback text;
//! nothing here retries or caches.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Aggregate series handed to the model, both pre-serialized to JSON text.
#[derive(Debug, Clone, Serialize)]
pub struct InsightsInput {
    pub attendance_data: String,
    pub revenue_data: String,
}

/// Free-text analysis returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InsightsOutput {
    /// Summary of key trends in attendance and revenue
    pub summary: String,
    /// Forecast of future attendance
    pub forecast: String,
}

impl InsightsOutput {
    /// Static text shown when the model call fails for any reason.
    pub fn fallback() -> Self {
        Self {
            summary: "Could not load AI summary due to an error.".to_string(),
            forecast: "Could not load AI forecast due to an error.".to_string(),
        }
    }
}

/// Gemini API client.
#[derive(Clone)]
pub struct InsightsClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    /// When absent the client is unconfigured and every call errors, which
    /// the insights route turns into fallback text.
    api_key: Option<String>,
}

impl InsightsClient {
    pub fn new(model: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GEMINI_BASE_URL.to_string(),
            model,
            api_key,
        }
    }

    /// Override the endpoint, for tests against a local stub server.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Run the insights prompt and parse the structured response.
    pub async fn complete(&self, input: &InsightsInput) -> Result<InsightsOutput, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::InsightsApi("Gemini API key not configured".to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(input) }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "summary": { "type": "STRING" },
                        "forecast": { "type": "STRING" },
                    },
                    "required": ["summary", "forecast"],
                },
            },
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::InsightsApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InsightsApi(format!("HTTP {}: {}", status, body)));
        }

        let completion: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::InsightsApi(format!("JSON parse error: {}", e)))?;

        let text = completion
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AppError::InsightsApi("Empty completion".to_string()))?;

        serde_json::from_str(&text)
            .map_err(|e| AppError::InsightsApi(format!("Malformed completion: {}", e)))
    }
}

/// Fixed instruction template with the two serialized series interpolated.
fn build_prompt(input: &InsightsInput) -> String {
    format!(
        "You are an AI assistant helping a gym admin understand trends in their business.\n\
         \n\
         Summarize the key trends in member attendance and revenue based on the provided data.\n\
         Also, provide a forecast of future attendance based on current trends.\n\
         \n\
         Attendance Data: {}\n\
         Revenue Data: {}\n",
        input.attendance_data, input.revenue_data
    )
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}
