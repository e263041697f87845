//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! in the CRUD handlers before anything reaches the database.

use crate::utils::{AppError, time};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: shop names, customer names, account names
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
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
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a new password before hashing.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN} characters)"
        )));
    }
    Ok(())
}

/// Validate shop schedule invariants: open < close, duration > 0, capacity >= 1.
///
/// Applied at shop create/update so the booking engine can rely on them.
pub fn validate_shop_schedule(
    opening_time: &str,
    closing_time: &str,
    slot_duration: i64,
    max_capacity: i64,
) -> Result<(), AppError> {
    let open = time::parse_time(opening_time)?;
    let close = time::parse_time(closing_time)?;
    if open >= close {
        return Err(AppError::validation(format!(
            "opening_time {opening_time} must be before closing_time {closing_time}"
        )));
    }
    if slot_duration <= 0 {
        return Err(AppError::validation("slot_duration must be positive"));
    }
    if max_capacity < 1 {
        return Err(AppError::validation("max_capacity must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank_and_oversized() {
        assert!(validate_required_text("Barber", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn shop_schedule_invariants() {
        assert!(validate_shop_schedule("09:00", "18:00", 30, 1).is_ok());
        // open >= close is a validation error at configuration time
        assert!(validate_shop_schedule("18:00", "09:00", 30, 1).is_err());
        assert!(validate_shop_schedule("09:00", "09:00", 30, 1).is_err());
        assert!(validate_shop_schedule("09:00", "18:00", 0, 1).is_err());
        assert!(validate_shop_schedule("09:00", "18:00", 30, 0).is_err());
    }
}
