use crate::config::ServerConfig;
use crate::session::SessionSigner;
use anyhow::Context;
use hotpuppy_core::providers::image::{ImageGenerator, OpenAIImageClient};
use hotpuppy_core::{EvolutionChain, SeedStatus, Store};
use std::sync::Arc;

/// Everything a handler needs, built once at startup and shared via `Arc`.
pub struct AppContext {
    pub cfg: ServerConfig,
    pub chain: EvolutionChain,
    pub session: SessionSigner,
}

impl AppContext {
    pub fn new(cfg: ServerConfig, chain: EvolutionChain) -> Self {
        let session = SessionSigner::new(&cfg.session_secret);
        Self {
            cfg,
            chain,
            session,
        }
    }

    /// Opens the store and wires the generator described by `cfg`.
    /// Any failure here keeps the process from serving.
    pub fn from_config(cfg: ServerConfig) -> anyhow::Result<Self> {
        let store = Store::open(&cfg.db_path)
            .with_context(|| format!("failed to initialize store at {}", cfg.db_path.display()))?;
        store.init_schema().context("failed to create schema")?;
        tracing::info!(event = "store_ready", path = %cfg.db_path.display());

        let generator = build_generator(&cfg);
        Ok(Self::new(cfg, EvolutionChain::new(store, generator)))
    }

    pub fn store(&self) -> &Store {
        self.chain.store()
    }

    pub async fn ensure_seeded(&self) -> anyhow::Result<SeedStatus> {
        self.chain.ensure_seeded().await
    }
}

pub fn build_generator(cfg: &ServerConfig) -> ImageGenerator {
    match &cfg.openai_api_key {
        Some(key) => {
            let client = OpenAIImageClient::new(cfg.image_model.clone(), key.clone())
                .with_api_base(&cfg.openai_api_base);
            ImageGenerator::new(Some(Arc::new(client)))
        }
        None => {
            tracing::warn!(
                event = "provider_unconfigured",
                "OPENAI_API_KEY not configured, every image will be a placeholder"
            );
            ImageGenerator::placeholder_only()
        }
    }
}
