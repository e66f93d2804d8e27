use crate::{strip_code_fences, system_instruction, GenerateError, GenerationConfig};
use serde::{Deserialize, Serialize};

/// Anything that turns a prompt plus current code into a new document
#[async_trait::async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, current_code: &str) -> Result<String, GenerateError>;
}

/// `generateContent` REST client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GenerationConfig,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build a client, reading the key from `config.api_key_env`.
    ///
    /// A missing key is not an error here; requests fail with
    /// [`GenerateError::MissingApiKey`] instead.
    pub fn from_config(config: GenerationConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::error!(var = %config.api_key_env, "API key missing from environment");
        }
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: GenerationConfig, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            api_key,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait::async_trait]
impl CodeGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, current_code: &str) -> Result<String, GenerateError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerateError::MissingApiKey(self.config.api_key_env.clone()))?;

        let body = GenerateRequest {
            system_instruction: Content::text(None, system_instruction(current_code)),
            contents: vec![Content::text(Some("user"), prompt.to_string())],
            generation_config: GenerationParams {
                temperature: self.config.temperature,
            },
        };

        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "sending generation request");

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateResponse = response.json().await?;
        let text = payload.text();
        if text.trim().is_empty() {
            return Err(GenerateError::EmptyResponse);
        }

        Ok(strip_code_fences(&text))
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationParams,
}

#[derive(Debug, Serialize)]
struct GenerationParams {
    temperature: f32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: String) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: Some(text) }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = GenerateRequest {
            system_instruction: Content::text(None, "sys".to_string()),
            contents: vec![Content::text(Some("user"), "hi".to_string())],
            generation_config: GenerationParams { temperature: 0.5 },
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let payload: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"<p>"},{"text":"x</p>"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.text(), "<p>x</p>");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let config = GenerationConfig {
            endpoint: "http://localhost:9/".to_string(),
            model: "m".to_string(),
            ..GenerationConfig::default()
        };
        let client = GeminiClient::with_api_key(config, None);
        assert_eq!(client.url(), "http://localhost:9/v1beta/models/m:generateContent");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = GeminiClient::with_api_key(GenerationConfig::default(), None);
        let err = client.generate("x", "").await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingApiKey(var) if var == "API_KEY"));
    }
}
