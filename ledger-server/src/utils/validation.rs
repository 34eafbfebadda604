//! Input validation helpers
//!
//! Centralized text length constants and field-keyed validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! here before anything reaches a repository.

use super::error::FieldErrors;

// ── Text length limits ──────────────────────────────────────────────

/// Notes, descriptions, rejection reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Rejecting a timesheet requires a substantive reason
pub const MIN_REJECTION_REASON_LEN: usize = 10;

// ── Validation helpers ──────────────────────────────────────────────

/// Check an optional string against the length limit.
pub fn check_optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<String>,
    max_len: usize,
) {
    if let Some(v) = value
        && v.len() > max_len
    {
        errors.add(
            field,
            format!("{field} is too long ({} chars, max {max_len})", v.len()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_text_only_checks_present_values() {
        let mut e = FieldErrors::new();
        check_optional_text(&mut e, "note", &None, MAX_NOTE_LEN);
        assert!(e.is_empty());
        check_optional_text(&mut e, "note", &Some("y".repeat(MAX_NOTE_LEN + 1)), MAX_NOTE_LEN);
        assert!(!e.is_empty());
    }
}
