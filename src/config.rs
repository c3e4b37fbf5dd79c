use serde::Deserialize;
use std::env;

use crate::error::{GatewayError, Result};

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn require_env(var: &str) -> Result<String> {
    env::var(var).map_err(|_| GatewayError::Config(format!("{var} is missing")))
}

/// Parse a comma-separated list env var, trimming entries and dropping empties.
fn parse_env_list(var: &str, default: &[&str]) -> Vec<String> {
    match env::var(var) {
        Ok(val) if !val.is_empty() => val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: Option<LlmConfig>,
    pub persona: PersonaMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub key: String,
    pub table: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// LLM configuration for the chat model.
///
/// Present only when `GEMINI_API_KEY` is set; without it the gateway starts
/// anyway and `/chat` answers with a fixed unavailable message.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub selection: SelectionPolicy,
    pub preferred_model: String,
    pub fallback_model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// How the chat model is chosen at startup.
///
/// `Discovery` asks the provider for its model list and picks from a fixed
/// priority order; `Direct` validates a configured identifier and falls back
/// to a fixed secondary one. Both end with exactly one usable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    Discovery,
    Direct,
}

impl SelectionPolicy {
    fn from_env() -> Self {
        match env::var("MODEL_SELECTION") {
            Ok(val) => match val.to_lowercase().as_str() {
                "discovery" => Self::Discovery,
                "direct" => Self::Direct,
                other => {
                    tracing::warn!("Unknown MODEL_SELECTION '{}', using 'discovery'", other);
                    Self::Discovery
                }
            },
            Err(_) => Self::Discovery,
        }
    }
}

/// Which persona instruction block `/chat` prepends to the prompt.
///
/// `Strict` only ever recommends universities from the fetched list;
/// `DocumentWriting` additionally allows free-form writing when the user asks
/// for a document such as a statement of purpose, essay, or email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaMode {
    Strict,
    DocumentWriting,
}

impl PersonaMode {
    fn from_env() -> Self {
        match env::var("PERSONA_MODE") {
            Ok(val) => match val.to_lowercase().as_str() {
                "strict" => Self::Strict,
                "document-writing" | "document_writing" => Self::DocumentWriting,
                other => {
                    tracing::warn!("Unknown PERSONA_MODE '{}', using 'document-writing'", other);
                    Self::DocumentWriting
                }
            },
            Err(_) => Self::DocumentWriting,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_or("PORT", 8000),
            cors_origins: parse_env_list("CORS_ORIGINS", &["http://localhost:3000"]),
        };

        let database = DatabaseConfig {
            url: require_env("SUPABASE_URL")?,
            key: require_env("SUPABASE_KEY")?,
            table: env::var("SUPABASE_TABLE").unwrap_or_else(|_| "universities".to_string()),
            timeout_secs: parse_env_or("SUPABASE_TIMEOUT", 10),
            max_retries: parse_env_or("SUPABASE_MAX_RETRIES", 1),
        };

        let llm = match env::var("GEMINI_API_KEY") {
            Ok(api_key) if !api_key.is_empty() => Some(LlmConfig {
                api_key,
                base_url: env::var("GEMINI_BASE_URL").ok(),
                selection: SelectionPolicy::from_env(),
                preferred_model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "models/gemini-1.5-flash".to_string()),
                fallback_model: env::var("GEMINI_FALLBACK_MODEL")
                    .unwrap_or_else(|_| "models/gemini-pro".to_string()),
                timeout_secs: parse_env_or("GEMINI_TIMEOUT", 30),
                max_retries: parse_env_or("GEMINI_MAX_RETRIES", 1),
            }),
            _ => {
                tracing::warn!("GEMINI_API_KEY is missing. Chat will be degraded.");
                None
            }
        };

        Ok(Self {
            server,
            database,
            llm,
            persona: PersonaMode::from_env(),
        })
    }
}
