//! Internal helpers for name normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim a user-supplied display name and reject empty input.
pub(crate) fn normalize_display_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Case-insensitive lookup key for a display name (NFKC + lowercase).
///
/// Stored in the `name_norm` column so uniqueness checks survive case and
/// composed/decomposed Unicode differences.
pub(crate) fn normalize_name_key(display: &str) -> String {
    display.nfkc().collect::<String>().to_lowercase()
}
