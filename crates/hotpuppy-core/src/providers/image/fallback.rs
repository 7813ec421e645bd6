// fallback.rs - Placeholder images for when generation is unavailable
//
// Provider failures never reach the visitor. The generator substitutes a
// deterministic placeholder and leaves an audit trail in the logs.

use super::generator::GenerationPurpose;

const PLACEHOLDER_BASE: &str = "https://placedog.net/1024/1024";

/// Placeholder for the record expected to receive `seq` as its id.
///
/// Deterministic: the same `seq` always maps to the same image.
pub fn placeholder_url(seq: u64) -> String {
    format!("{PLACEHOLDER_BASE}?id={seq}")
}

/// Logs a fallback event in structured form.
///
/// Ops can tell from the `reason` whether the key is missing or the provider
/// is misbehaving.
pub(crate) fn log_fallback(purpose: GenerationPurpose, reason: &str, placeholder_url: &str) {
    tracing::warn!(
        event = "hotpuppy.generation.fallback",
        purpose = purpose.as_str(),
        reason = %reason,
        placeholder_url = %placeholder_url,
        "Using placeholder image: {}", reason
    );
}
