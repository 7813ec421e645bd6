use super::ImageClient;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "dall-e-3";

pub struct OpenAIImageClient {
    pub model: String,
    pub api_key: String,
    pub api_base: String,
    pub size: String,
    pub quality: String,
    pub client: reqwest::Client,
}

impl OpenAIImageClient {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/images/generations", self.api_base)
    }
}

#[async_trait]
impl ImageClient for OpenAIImageClient {
    async fn generate(&self, prompt: &str, timeout: Duration) -> anyhow::Result<String> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": self.size,
            "quality": self.quality,
        });

        tracing::debug!(event = "generation_request", provider = "openai", model = %self.model);

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(timeout)
            .send()
            .await?;

        let status = resp.status();
        tracing::debug!(event = "generation_response", provider = "openai", status = status.as_u16());

        if status != reqwest::StatusCode::OK {
            let error_text = resp.text().await.unwrap_or_default();
            let snippet: String = error_text.chars().take(200).collect();
            anyhow::bail!("OpenAI images API error {}: {}", status.as_u16(), snippet);
        }

        let json: serde_json::Value = resp.json().await?;

        let url = json
            .pointer("/data/0/url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("OpenAI images response missing data[0].url"))?
            .to_string();

        Ok(url)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
