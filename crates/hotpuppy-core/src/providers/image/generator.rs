use super::fallback::{log_fallback, placeholder_url};
use super::ImageClient;
use crate::model::GenerationOutcome;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Why an image is being generated. Each purpose carries its own time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPurpose {
    Seed,
    Evolution,
}

impl GenerationPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationPurpose::Seed => "seed",
            GenerationPurpose::Evolution => "evolution",
        }
    }

    pub fn default_timeout(&self) -> Duration {
        match self {
            GenerationPurpose::Seed => Duration::from_secs(30),
            GenerationPurpose::Evolution => Duration::from_secs(60),
        }
    }
}

/// Front door for image generation.
///
/// Makes at most one provider call per invocation and never fails: a missing
/// provider, a timeout, a transport error or a bad response all resolve to a
/// placeholder outcome with `fallback` set.
#[derive(Clone)]
pub struct ImageGenerator {
    client: Option<Arc<dyn ImageClient>>,
    seed_timeout: Duration,
    evolution_timeout: Duration,
}

impl ImageGenerator {
    pub fn new(client: Option<Arc<dyn ImageClient>>) -> Self {
        Self {
            client,
            seed_timeout: GenerationPurpose::Seed.default_timeout(),
            evolution_timeout: GenerationPurpose::Evolution.default_timeout(),
        }
    }

    pub fn placeholder_only() -> Self {
        Self::new(None)
    }

    pub fn with_timeouts(mut self, seed: Duration, evolution: Duration) -> Self {
        self.seed_timeout = seed;
        self.evolution_timeout = evolution;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.client
            .as_ref()
            .map(|c| c.provider_name())
            .unwrap_or("placeholder")
    }

    pub fn timeout_for(&self, purpose: GenerationPurpose) -> Duration {
        match purpose {
            GenerationPurpose::Seed => self.seed_timeout,
            GenerationPurpose::Evolution => self.evolution_timeout,
        }
    }

    /// `placeholder_seq` is the id the resulting record is expected to get;
    /// it selects the placeholder image if one is needed.
    pub async fn generate(
        &self,
        prompt: &str,
        purpose: GenerationPurpose,
        placeholder_seq: u64,
    ) -> GenerationOutcome {
        let Some(client) = &self.client else {
            return Self::fallback(prompt, purpose, placeholder_seq, "image provider not configured");
        };

        let limit = self.timeout_for(purpose);
        let start = Instant::now();
        let reason = match timeout(limit, client.generate(prompt, limit)).await {
            Ok(Ok(url)) => {
                tracing::info!(
                    event = "generation_ok",
                    provider = client.provider_name(),
                    purpose = purpose.as_str(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                return GenerationOutcome::generated(url, prompt);
            }
            Ok(Err(e)) => format!("{} request failed: {e:#}", client.provider_name()),
            Err(_) => format!(
                "{} request exceeded {}ms",
                client.provider_name(),
                limit.as_millis()
            ),
        };

        Self::fallback(prompt, purpose, placeholder_seq, &reason)
    }

    fn fallback(
        prompt: &str,
        purpose: GenerationPurpose,
        placeholder_seq: u64,
        reason: &str,
    ) -> GenerationOutcome {
        let url = placeholder_url(placeholder_seq);
        log_fallback(purpose, reason, &url);
        GenerationOutcome::placeholder(url, prompt)
    }
}
