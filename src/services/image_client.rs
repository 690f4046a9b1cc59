use crate::{
    asset::ImageAsset,
    config::FreepikConfig,
    error::{ForgeError, Result},
    models::FreepikImageResponse,
    services::traits::GenerateImage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://api.freepik.com/v1/ai/text-to-image";
const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_EXCERPT_CHARS: usize = 200;

/// Client for the Freepik text-to-image API.
pub struct FreepikImageClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl FreepikImageClient {
    pub fn new(config: FreepikConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| ForgeError::Config("Freepik API key is required".into()))?;

        let client = Client::builder()
            .timeout(GENERATION_TIMEOUT)
            .build()
            .map_err(|e| ForgeError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key,
        })
    }

    async fn download_image(&self, url: &str) -> Result<ImageAsset> {
        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| ForgeError::Request(format!("Image download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ForgeError::Request(format!(
                "Image download failed with status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ForgeError::Request(format!("Image download failed: {}", e)))?;

        ImageAsset::from_bytes(&bytes)
    }
}

/// Where a recognized response says the pixels are: inlined as base64 or
/// behind a download URL.
#[derive(Debug)]
enum ImagePayload {
    Inline(String),
    Remote(String),
}

/// Maps a raw response body onto one of the known layouts. A body that is
/// not JSON at all and a JSON body fitting none of the layouts produce
/// distinct errors, each carrying a capped excerpt of the offending body.
fn decode_body(body: &str) -> Result<ImagePayload> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|_| ForgeError::Response(format!("Freepik returned non-JSON: {}", excerpt(body))))?;
    let parsed: FreepikImageResponse = serde_json::from_value(value).map_err(|_| {
        ForgeError::Response(format!("Unrecognized Freepik structure: {}", excerpt(body)))
    })?;

    // Known layouts, checked in order: result list carrying inline
    // base64, result list carrying a URL, then a top-level base64 field.
    if let Some(items) = parsed.data {
        let item = items
            .into_iter()
            .next()
            .ok_or_else(|| ForgeError::Response("Freepik returned an empty result list".into()))?;
        if let Some(b64) = item.b64 {
            return Ok(ImagePayload::Inline(b64));
        }
        if let Some(url) = item.url {
            return Ok(ImagePayload::Remote(url));
        }
    }

    if let Some(b64) = parsed.image_base64 {
        return Ok(ImagePayload::Inline(b64));
    }

    Err(ForgeError::Response(format!(
        "Unrecognized Freepik structure: {}",
        excerpt(body)
    )))
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[async_trait]
impl GenerateImage for FreepikImageClient {
    async fn generate(&self, prompt: &str, width: u32, height: u32) -> Result<ImageAsset> {
        let payload = json!({
            "prompt": prompt,
            "width": width,
            "height": height,
        });

        log::info!("Requesting {}x{} background from Freepik", width, height);

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Freepik-API-Key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ForgeError::Request(format!("Freepik request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ForgeError::Request(format!(
                "Freepik returned {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ForgeError::Request(format!("Failed to read Freepik response: {}", e)))?;

        match decode_body(&body)? {
            ImagePayload::Inline(b64) => ImageAsset::from_base64(&b64),
            ImagePayload::Remote(url) => self.download_image(&url).await,
        }
    }
}
