//! Pure model-selection logic, kept free of IO so the fallback chain is
//! directly testable.

use crate::llm::api::ModelInfo;

/// Preferred model identifiers, in order.
pub const PRIORITY_MODELS: &[&str] = &[
    "models/gemini-1.5-flash",
    "models/gemini-1.5-pro",
    "models/gemini-pro",
];

/// Last-resort identifier when discovery yields nothing.
pub const DEFAULT_MODEL: &str = "models/gemini-pro";

/// Keep only models that support content generation, preserving listing order.
pub fn generation_models(models: Vec<ModelInfo>) -> Vec<String> {
    models
        .into_iter()
        .filter(ModelInfo::supports_generation)
        .map(|m| m.name)
        .collect()
}

/// Pick a model from a discovery result.
///
/// The first priority entry present in the discovered set wins, regardless of
/// where it sits in the discovered list. With no priority match the first
/// discovered model is used; with nothing discovered, the fixed default.
pub fn select_from_discovery(discovered: &[String], priority: &[&str], default: &str) -> String {
    for candidate in priority {
        if discovered.iter().any(|m| m == candidate) {
            return (*candidate).to_string();
        }
    }

    discovered
        .first()
        .cloned()
        .unwrap_or_else(|| default.to_string())
}
