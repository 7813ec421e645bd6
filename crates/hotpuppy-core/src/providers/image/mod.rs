use async_trait::async_trait;
use std::time::Duration;

/// A text-to-image provider. Returns the URL of the generated image.
#[async_trait]
pub trait ImageClient: Send + Sync {
    async fn generate(&self, prompt: &str, timeout: Duration) -> anyhow::Result<String>;
    fn provider_name(&self) -> &'static str;
}

pub mod fallback;
pub mod generator;
pub mod openai;

pub use fallback::placeholder_url;
pub use generator::{GenerationPurpose, ImageGenerator};
pub use openai::OpenAIImageClient;
