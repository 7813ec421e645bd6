use crate::evolve::{self, SEED_PROMPT};
use crate::providers::image::{GenerationPurpose, ImageGenerator};
use crate::storage::Store;

/// Lifecycle of the chain, derived from the record count. No transition ever
/// moves backwards; only an out-of-band reset returns the store to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Empty,
    Seeded,
    Evolving(u64),
}

impl ChainState {
    pub fn from_count(count: u64) -> Self {
        match count {
            0 => ChainState::Empty,
            1 => ChainState::Seeded,
            n => ChainState::Evolving(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStatus {
    Created { id: i64, fallback: bool },
    AlreadySeeded { count: u64 },
}

/// A freshly appended link of the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Evolution {
    pub image_id: i64,
    pub parent_id: i64,
    pub image_url: String,
    pub prompt: String,
    pub user_input: String,
    pub fallback: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum EvolveError {
    #[error("User input cannot be empty")]
    EmptyInput,
    #[error("No seed image found. Please wait for initialization.")]
    NotSeeded,
    #[error("Failed to load the current image")]
    Lookup(#[source] anyhow::Error),
    #[error("Failed to save the evolved image")]
    Storage(#[source] anyhow::Error),
}

impl EvolveError {
    /// HTTP-style classification: caller mistakes are 4xx, our failures 5xx.
    pub fn status_code(&self) -> u16 {
        match self {
            EvolveError::EmptyInput | EvolveError::NotSeeded => 400,
            EvolveError::Lookup(_) | EvolveError::Storage(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EvolveError::EmptyInput => "E_EMPTY_INPUT",
            EvolveError::NotSeeded => "E_NOT_SEEDED",
            EvolveError::Lookup(_) => "E_LOOKUP",
            EvolveError::Storage(_) => "E_STORAGE",
        }
    }
}

/// The store and the generator, wired into seed and evolve.
#[derive(Clone)]
pub struct EvolutionChain {
    store: Store,
    generator: ImageGenerator,
}

impl EvolutionChain {
    pub fn new(store: Store, generator: ImageGenerator) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn generator(&self) -> &ImageGenerator {
        &self.generator
    }

    pub fn state(&self) -> anyhow::Result<ChainState> {
        Ok(ChainState::from_count(self.store.count()?))
    }

    /// Plants the seed image if the store is empty. Safe to call repeatedly.
    pub async fn ensure_seeded(&self) -> anyhow::Result<SeedStatus> {
        let count = self.store.blocking(|s| s.count()).await?;
        if count > 0 {
            tracing::info!(event = "seed_exists", count = count);
            return Ok(SeedStatus::AlreadySeeded { count });
        }

        tracing::info!(event = "seed_start", provider = self.generator.provider_name());
        let outcome = self
            .generator
            .generate(SEED_PROMPT, GenerationPurpose::Seed, 1)
            .await;

        let image_url = outcome.image_url.clone();
        let appended = self
            .store
            .blocking(move |s| s.append(&image_url, SEED_PROMPT, None, true))
            .await;

        match appended {
            Ok(id) => {
                tracing::info!(
                    event = "seed_created",
                    id = id,
                    fallback = outcome.fallback,
                    image_url = %outcome.image_url
                );
                Ok(SeedStatus::Created {
                    id,
                    fallback: outcome.fallback,
                })
            }
            Err(e) => {
                // Another process may have seeded while we were generating.
                let count = self.store.blocking(|s| s.count()).await?;
                if count > 0 {
                    tracing::info!(event = "seed_exists", count = count);
                    Ok(SeedStatus::AlreadySeeded { count })
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Derives and appends the next image from the current one.
    ///
    /// Input is validated before anything else, so a rejected request never
    /// reaches the provider. Reading the parent and appending the child are
    /// separate statements: concurrent calls may fork the chain, and the
    /// highest id stays canonical.
    pub async fn evolve(&self, raw_input: &str) -> Result<Evolution, EvolveError> {
        let user_input = evolve::normalize_input(raw_input).ok_or(EvolveError::EmptyInput)?;

        let current = self
            .store
            .blocking(|s| s.latest())
            .await
            .map_err(EvolveError::Lookup)?
            .ok_or(EvolveError::NotSeeded)?;

        tracing::debug!(event = "evolve_from", parent_id = current.id);

        let prompt = evolve::evolve(&current.prompt, user_input);
        let outcome = self
            .generator
            .generate(&prompt, GenerationPurpose::Evolution, (current.id + 1) as u64)
            .await;

        let (image_url, prompt, input) = (
            outcome.image_url.clone(),
            outcome.prompt.clone(),
            user_input.to_string(),
        );
        let image_id = self
            .store
            .blocking(move |s| s.append(&image_url, &prompt, Some(&input), false))
            .await
            .map_err(EvolveError::Storage)?;

        Ok(Evolution {
            image_id,
            parent_id: current.id,
            image_url: outcome.image_url,
            prompt: outcome.prompt,
            user_input: user_input.to_string(),
            fallback: outcome.fallback,
        })
    }
}
