//! Input validation helpers
//!
//! Text length limits shared by the workflow actions. SQLite TEXT has no
//! built-in length enforcement.

use crate::fulfillment::FulfillmentError;

// ── Text length limits ──────────────────────────────────────────────

/// Notes, reasons (cancellation reason, damage reason, job notes, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: payment reference, supplier name, serial codes
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers (workflow actions) ───────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(
    value: &str,
    field: &str,
    max_len: usize,
) -> Result<(), FulfillmentError> {
    if value.trim().is_empty() {
        return Err(FulfillmentError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(FulfillmentError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), FulfillmentError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(FulfillmentError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a strictly positive quantity
pub fn validate_quantity(quantity: i64, field: &str) -> Result<(), FulfillmentError> {
    if quantity <= 0 {
        return Err(FulfillmentError::Validation(format!(
            "{field} must be positive, got {quantity}"
        )));
    }
    Ok(())
}
