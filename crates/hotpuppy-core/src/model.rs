use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable link of the evolution chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    pub image_url: String,
    pub prompt: String,
    pub user_input: Option<String>,
    pub is_seed: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of one generation attempt. `success` holds on both the provider and
/// the placeholder path; `fallback` marks the placeholder path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub image_url: String,
    pub prompt: String,
    pub success: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl GenerationOutcome {
    pub fn generated(image_url: String, prompt: &str) -> Self {
        Self {
            image_url,
            prompt: prompt.to_string(),
            success: true,
            fallback: false,
        }
    }

    pub fn placeholder(image_url: String, prompt: &str) -> Self {
        Self {
            image_url,
            prompt: prompt.to_string(),
            success: true,
            fallback: true,
        }
    }
}
