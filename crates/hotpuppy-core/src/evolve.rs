//! Prompt evolution.
//!
//! The provider cannot condition on the previous image, so each generation is
//! anchored textually: the prior prompt carries the subject and style, the
//! visitor's text is blended in with a fixed 70/30 weighting instruction.

/// Prompt for the first image of every chain.
pub const SEED_PROMPT: &str = "a hot puppy - a stylish, cool, fashionable puppy wearing sunglasses, vibrant and eye-catching, digital art";

/// Weight kept from the prior image, in percent. The remainder goes to the new input.
pub const PRIOR_WEIGHT_PCT: u8 = 70;

/// Composes the next prompt from the current one and the visitor's text.
///
/// Pure: identical inputs always yield the identical prompt.
pub fn evolve(prior_prompt: &str, user_input: &str) -> String {
    format!(
        "Building upon this concept: {prior_prompt}. Now evolving with this addition: {user_input}. \
         Maintain {keep}% of the original style and subject, while incorporating {blend}% of the new idea. \
         Keep the same artistic style and overall composition.",
        keep = PRIOR_WEIGHT_PCT,
        blend = 100 - PRIOR_WEIGHT_PCT,
    )
}

/// Trims surrounding whitespace; `None` when nothing is left.
pub fn normalize_input(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
