use crate::config::{LlmConfig, SelectionPolicy};
use crate::error::{GatewayError, Result};
use crate::llm::api::GeminiApiClient;
use crate::llm::selection::{
    generation_models, select_from_discovery, DEFAULT_MODEL, PRIORITY_MODELS,
};

/// Fixed reply sent on `/chat` while no model is usable.
pub const UNAVAILABLE_MESSAGE: &str = "AI Service Unavailable. Check server logs.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelBackend {
    Gemini { model: String },
    Unavailable { reason: String },
}

/// The process-wide handle to the selected generation model.
///
/// Selected exactly once at startup and shared read-only by every request, so
/// the fallback chain never runs on the request path.
#[derive(Debug, Clone)]
pub struct ModelProvider {
    backend: ModelBackend,
    client: Option<GeminiApiClient>,
}

impl ModelProvider {
    /// Resolve a model per the configured selection policy.
    ///
    /// Discovery mode never fails: listing errors are logged and treated as an
    /// empty discovery, which falls through to the fixed default identifier.
    /// Direct mode validates the preferred identifier, then the fallback; a
    /// bad fallback is a startup error.
    pub async fn select(config: Option<&LlmConfig>) -> Result<Self> {
        let Some(config) = config else {
            return Ok(Self::unavailable("No LLM configuration provided"));
        };

        let client = match GeminiApiClient::new(config) {
            Ok(client) => client,
            Err(e) => {
                if config.selection == SelectionPolicy::Direct {
                    return Err(e);
                }
                tracing::warn!("Could not build Gemini client: {e}");
                return Ok(Self::unavailable(&e.to_string()));
            }
        };

        let model = match config.selection {
            SelectionPolicy::Discovery => {
                let discovered = match client.list_models().await {
                    Ok(models) => generation_models(models),
                    Err(e) => {
                        tracing::warn!("Could not list models: {e}");
                        Vec::new()
                    }
                };
                select_from_discovery(&discovered, PRIORITY_MODELS, DEFAULT_MODEL)
            }
            SelectionPolicy::Direct => match client.get_model(&config.preferred_model).await {
                Ok(info) => info.name,
                Err(e) => {
                    tracing::warn!(
                        "Preferred model '{}' unavailable: {e}. Trying fallback '{}'.",
                        config.preferred_model,
                        config.fallback_model
                    );
                    client
                        .get_model(&config.fallback_model)
                        .await
                        .map_err(|e| {
                            GatewayError::Llm(format!(
                                "fallback model '{}' is invalid: {e}",
                                config.fallback_model
                            ))
                        })?
                        .name
                }
            },
        };

        tracing::info!("Selected model: {model}");
        Ok(Self {
            backend: ModelBackend::Gemini { model },
            client: Some(client),
        })
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: ModelBackend::Unavailable {
                reason: reason.to_string(),
            },
            client: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, ModelBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &ModelBackend {
        &self.backend
    }

    pub fn model_name(&self) -> Option<&str> {
        match &self.backend {
            ModelBackend::Gemini { model } => Some(model),
            ModelBackend::Unavailable { .. } => None,
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        match (&self.backend, &self.client) {
            (ModelBackend::Gemini { model }, Some(client)) => {
                client.generate_content(model, prompt).await
            }
            _ => Err(GatewayError::LlmUnavailable(self.unavailable_reason())),
        }
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            ModelBackend::Unavailable { reason } => reason.clone(),
            _ => "no API client".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(base_url: &str, selection: SelectionPolicy) -> LlmConfig {
        LlmConfig {
            api_key: "test-key".to_string(),
            base_url: Some(base_url.to_string()),
            selection,
            preferred_model: "models/gemini-1.5-flash".to_string(),
            fallback_model: "models/gemini-pro".to_string(),
            timeout_secs: 5,
            max_retries: 0,
        }
    }

    #[tokio::test]
    async fn test_no_config_means_unavailable() {
        let provider = ModelProvider::select(None).await.unwrap();
        assert!(!provider.is_available());
        assert_eq!(provider.model_name(), None);

        let err = provider.generate("hi").await.unwrap_err();
        assert!(matches!(err, GatewayError::LlmUnavailable(_)));
    }

    #[tokio::test]
    async fn test_discovery_picks_priority_model() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1beta/models");
            then.status(200).json_body(json!({
                "models": [
                    {"name": "models/other", "supportedGenerationMethods": ["generateContent"]},
                    {"name": "models/gemini-1.5-pro", "supportedGenerationMethods": ["generateContent"]}
                ]
            }));
        });

        let config = test_config(&server.base_url(), SelectionPolicy::Discovery);
        let provider = ModelProvider::select(Some(&config)).await.unwrap();
        assert_eq!(provider.model_name(), Some("models/gemini-1.5-pro"));
        assert!(matches!(
            provider.backend(),
            ModelBackend::Gemini { model } if model == "models/gemini-1.5-pro"
        ));
    }

    #[tokio::test]
    async fn test_discovery_ignores_non_generation_models() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1beta/models");
            then.status(200).json_body(json!({
                "models": [
                    {"name": "models/gemini-1.5-flash", "supportedGenerationMethods": ["embedContent"]},
                    {"name": "models/custom", "supportedGenerationMethods": ["generateContent"]}
                ]
            }));
        });

        let config = test_config(&server.base_url(), SelectionPolicy::Discovery);
        let provider = ModelProvider::select(Some(&config)).await.unwrap();
        // The flash entry does not generate, so the first generating model wins.
        assert_eq!(provider.model_name(), Some("models/custom"));
    }

    #[tokio::test]
    async fn test_discovery_failure_degrades_to_default() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1beta/models");
            then.status(500).body("boom");
        });

        let config = test_config(&server.base_url(), SelectionPolicy::Discovery);
        let provider = ModelProvider::select(Some(&config)).await.unwrap();
        assert!(provider.is_available());
        assert_eq!(provider.model_name(), Some("models/gemini-pro"));
    }

    #[tokio::test]
    async fn test_direct_mode_uses_preferred_when_valid() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1beta/models/gemini-1.5-flash");
            then.status(200).json_body(json!({
                "name": "models/gemini-1.5-flash",
                "supportedGenerationMethods": ["generateContent"]
            }));
        });

        let config = test_config(&server.base_url(), SelectionPolicy::Direct);
        let provider = ModelProvider::select(Some(&config)).await.unwrap();
        assert_eq!(provider.model_name(), Some("models/gemini-1.5-flash"));
    }

    #[tokio::test]
    async fn test_direct_mode_falls_back_on_preferred_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1beta/models/gemini-1.5-flash");
            then.status(404).body("not found");
        });
        server.mock(|when, then| {
            when.method(GET).path("/v1beta/models/gemini-pro");
            then.status(200).json_body(json!({
                "name": "models/gemini-pro",
                "supportedGenerationMethods": ["generateContent"]
            }));
        });

        let config = test_config(&server.base_url(), SelectionPolicy::Direct);
        let provider = ModelProvider::select(Some(&config)).await.unwrap();
        assert_eq!(provider.model_name(), Some("models/gemini-pro"));
    }

    #[tokio::test]
    async fn test_direct_mode_invalid_fallback_is_fatal() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_contains("/v1beta/models/");
            then.status(404).body("not found");
        });

        let config = test_config(&server.base_url(), SelectionPolicy::Direct);
        let err = ModelProvider::select(Some(&config)).await.unwrap_err();
        assert!(err.to_string().contains("fallback model"));
    }

    #[tokio::test]
    async fn test_generate_routes_to_selected_model() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1beta/models");
            then.status(200).json_body(json!({
                "models": [
                    {"name": "models/gemini-1.5-flash", "supportedGenerationMethods": ["generateContent"]}
                ]
            }));
        });
        let generate = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-flash:generateContent");
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "answer"}]}}]
            }));
        });

        let config = test_config(&server.base_url(), SelectionPolicy::Discovery);
        let provider = ModelProvider::select(Some(&config)).await.unwrap();
        let text = provider.generate("question").await.unwrap();

        generate.assert();
        assert_eq!(text, "answer");
    }
}
