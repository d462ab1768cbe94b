//! LLM HTTP client
//!
//! Speaks the Gemini `generateContent` wire format. The client is the
//! one place that touches the network; it returns [`AiResult`] and the
//! gateway above it decides what a failure degrades to.

use super::{AiError, AiResult, LlmBackend};
use crate::config::AiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    client: Client,
    config: AiConfig,
    api_base_url: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> AiResult<Self> {
        if config.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(AiError::ConfigError("API key is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::ConfigError(e.to_string()))?;

        let api_base_url = config
            .api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            config: config.clone(),
            api_base_url,
        })
    }

    async fn generate_content(&self, prompt: &str) -> AiResult<String> {
        #[derive(Serialize)]
        struct Request {
            contents: Vec<Content>,
            #[serde(rename = "generationConfig")]
            generation_config: GenerationConfig,
        }

        #[derive(Serialize, Deserialize)]
        struct Content {
            role: Option<String>,
            parts: Vec<Part>,
        }

        #[derive(Serialize, Deserialize)]
        struct Part {
            text: String,
        }

        #[derive(Serialize)]
        struct GenerationConfig {
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            candidates: Option<Vec<Candidate>>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: Content,
        }

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| AiError::ConfigError("API key is not set".to_string()))?;

        let full_prompt = match &self.config.system_prompt {
            Some(system) => format!("{system}\n\n{prompt}"),
            None => prompt.to_string(),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base_url, self.config.model, api_key
        );

        let resp = self
            .client
            .post(&url)
            .json(&Request {
                contents: vec![Content {
                    role: Some("user".to_string()),
                    parts: vec![Part { text: full_prompt }],
                }],
                generation_config: GenerationConfig { temperature: 0.2 },
            })
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("Gemini error: {text}")));
        }

        let result: Response = resp
            .json()
            .await
            .map_err(|e| AiError::SerializationError(e.to_string()))?;

        if let Some(candidates) = result.candidates {
            if let Some(first) = candidates.first() {
                if let Some(part) = first.content.parts.first() {
                    return Ok(part.text.clone());
                }
            }
        }

        Ok(String::new())
    }
}

#[async_trait]
impl LlmBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> AiResult<String> {
        self.generate_content(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_missing_api_key() {
        let config = AiConfig::default();
        assert!(config.api_key.is_none());
        assert!(GeminiClient::new(&config).is_err());

        let blank = AiConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(GeminiClient::new(&blank).is_err());
    }

    #[test]
    fn test_accepts_configured_key() {
        let config = AiConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        assert!(GeminiClient::new(&config).is_ok());
    }
}
