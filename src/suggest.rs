//! Species autocomplete over a small fixed vocabulary.
//!
//! The vocabulary mirrors the handful of species worth filtering on; the
//! API itself accepts free text, so these are hints, not an allowlist.

/// Species offered as completions, in display order.
pub const SPECIES_VOCABULARY: [&str; 5] = ["human", "humanoid", "alien", "robot", "unknown"];

/// Vocabulary entries starting with `input`, case-insensitively, in
/// vocabulary order. Empty input yields no suggestions rather than the
/// whole vocabulary.
pub fn species_suggestions(input: &str) -> Vec<&'static str> {
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    SPECIES_VOCABULARY
        .iter()
        .filter(|word| word.starts_with(&needle))
        .copied()
        .collect()
}
