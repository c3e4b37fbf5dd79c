use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::LlmConfig;
use crate::error::{GatewayError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// A model as reported by the provider's listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// REST client for the Generative Language API.
#[derive(Debug, Clone)]
pub struct GeminiApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
}

impl GeminiApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Llm(format!("failed to build client: {e}")))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
        })
    }

    /// List every model the provider exposes.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/v1beta/models", self.base_url);
        let body = self.get_json(&url).await?;

        let parsed: ListModelsResponse = serde_json::from_value(body)
            .map_err(|e| GatewayError::Llm(format!("invalid model list: {e}")))?;
        Ok(parsed.models)
    }

    /// Fetch a single model by its full identifier (e.g. `models/gemini-pro`).
    pub async fn get_model(&self, name: &str) -> Result<ModelInfo> {
        let url = format!("{}/v1beta/{}", self.base_url, name);
        let body = self.get_json(&url).await?;

        serde_json::from_value(body)
            .map_err(|e| GatewayError::Llm(format!("invalid model info: {e}")))
    }

    /// Run one generation call and return the response text.
    pub async fn generate_content(&self, model: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/v1beta/{}:generateContent", self.base_url, model);
        let request_body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let mut attempt = 0;
        let body = loop {
            let result = self
                .http
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&request_body)
                .send()
                .await;

            match result {
                Ok(response) => break self.read_json(response).await?,
                // Only connect failures are safe to retry here; a timeout may
                // have reached the provider and started a generation.
                Err(e) if attempt < self.max_retries && e.is_connect() => {
                    attempt += 1;
                    tracing::warn!(
                        "generateContent failed ({e}), retry {attempt}/{}",
                        self.max_retries
                    );
                }
                Err(e) => return Err(e.into()),
            }
        };

        extract_text(&body)
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let mut attempt = 0;

        loop {
            let result = self
                .http
                .get(url)
                .query(&[("key", self.api_key.as_str())])
                .send()
                .await;

            match result {
                Ok(response) => return self.read_json(response).await,
                Err(e) if attempt < self.max_retries && (e.is_timeout() || e.is_connect()) => {
                    attempt += 1;
                    tracing::warn!(
                        "Gemini request failed ({e}), retry {attempt}/{}",
                        self.max_retries
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Llm(format!(
                "Gemini returned {status}: {body}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| GatewayError::Llm(format!("invalid response: {e}")))
    }
}

/// Pull the text out of a generateContent response, concatenating all parts of
/// the first candidate.
fn extract_text(body: &Value) -> Result<String> {
    let parts = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::Llm("no candidates in response".to_string()))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(GatewayError::Llm("empty response text".to_string()));
    }
    Ok(text)
}
