use serde::{Deserialize, Serialize};

/// Settings for the generation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Model name used in the request path
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature; low keeps output close to valid markup
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Base URL of the API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
        }
    }
}
