use crate::{
    config::OpenAiConfig,
    error::{ForgeError, Result},
    models::ChatCompletionResponse,
    services::traits::GenerateCaption,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

const CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const CAPTION_TIMEOUT: Duration = Duration::from_secs(15);
const CAPTION_TEMPERATURE: f32 = 0.7;
const CAPTION_MAX_TOKENS: u32 = 20;

/// Caption generation over the OpenAI chat-completions API. The token cap
/// keeps responses to a single short line.
pub struct OpenAiCaptionClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiCaptionClient {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| ForgeError::Config("OpenAI API key is required".into()))?;

        let client = Client::builder()
            .timeout(CAPTION_TIMEOUT)
            .build()
            .map_err(|e| ForgeError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

#[async_trait]
impl GenerateCaption for OpenAiCaptionClient {
    async fn caption(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": CAPTION_TEMPERATURE,
            "max_tokens": CAPTION_MAX_TOKENS,
        });

        log::info!("Requesting caption from model {}", self.model);

        let response = self
            .client
            .post(CHAT_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ForgeError::Request(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ForgeError::Request(format!(
                "OpenAI returned {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::Response(format!("Failed to parse chat response: {}", e)))?;

        let text = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| ForgeError::Response("Chat response contained no choices".into()))?;

        if text.is_empty() {
            return Err(ForgeError::Response("Chat response was empty".into()));
        }

        Ok(text)
    }
}
