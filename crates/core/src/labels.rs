//! Color label handling.

use crate::error::{CoreError, CoreResult};

/// Internal placeholder color for legacy records that never had a real one.
///
/// It keeps the (product, color, size) key total for single-color data, but
/// it is bookkeeping only: every caller-facing listing filters it out.
pub const DEFAULT_COLOR: &str = "DEFAULT";

/// Trim a color label, falling back to the placeholder when blank.
///
/// Ledger-side normalization for keys that must always resolve to a row.
pub fn normalize_color(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_COLOR.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validate a caller-supplied label: trimmed and non-empty.
///
/// `field` names the offending input in the error message.
pub fn validate_label(raw: &str, field: &str) -> CoreResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims() {
        assert_eq!(normalize_color("  Rosso "), "Rosso");
    }

    #[test]
    fn normalize_blank_falls_back_to_placeholder() {
        assert_eq!(normalize_color(""), DEFAULT_COLOR);
        assert_eq!(normalize_color("   "), DEFAULT_COLOR);
    }

    #[test]
    fn validate_rejects_blank() {
        assert!(validate_label("", "color").is_err());
        assert!(validate_label("  ", "color").is_err());
    }

    #[test]
    fn validate_trims() {
        assert_eq!(validate_label(" Blu ", "color").unwrap(), "Blu");
    }
}
