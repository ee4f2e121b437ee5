// Field constraints shared by the registration form, the wizard and profile edits

use std::ops::RangeInclusive;

use crate::errors::ReboundError;

pub const AGE_RANGE: RangeInclusive<u32> = 10..=100;
pub const HEIGHT_CM_RANGE: RangeInclusive<f64> = 100.0..=250.0;
pub const WEIGHT_KG_RANGE: RangeInclusive<f64> = 30.0..=200.0;

fn invalid(field: &str, reason: impl Into<String>) -> ReboundError {
    ReboundError::InvalidUserInput {
        field: field.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_full_name(full_name: &str) -> Result<(), ReboundError> {
    if full_name.trim().is_empty() {
        return Err(invalid("fullName", "Full Name is required"));
    }
    Ok(())
}

/// Checks that `email` looks like `local@domain.tld`.
///
/// This is the same coarse check a form library performs: a single `@`, no
/// whitespace, a non-empty local part and a dotted domain whose labels are
/// all non-empty.
pub fn validate_email(email: &str) -> Result<(), ReboundError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(invalid("email", "Email is required"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("email", "Valid email required"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("email", "Valid email required"));
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid("email", "Valid email required"));
    }
    if domain.split('.').any(str::is_empty) {
        return Err(invalid("email", "Valid email required"));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ReboundError> {
    if password.is_empty() {
        return Err(invalid("password", "Password is required"));
    }
    Ok(())
}

pub fn validate_age(age: u32) -> Result<(), ReboundError> {
    if !AGE_RANGE.contains(&age) {
        return Err(invalid(
            "age",
            format!(
                "must be between {} and {}",
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ),
        ));
    }
    Ok(())
}

pub fn validate_height_cm(height_cm: f64) -> Result<(), ReboundError> {
    if !HEIGHT_CM_RANGE.contains(&height_cm) {
        return Err(invalid(
            "heightCm",
            format!(
                "must be between {} and {} cm",
                HEIGHT_CM_RANGE.start(),
                HEIGHT_CM_RANGE.end()
            ),
        ));
    }
    Ok(())
}

pub fn validate_weight_kg(weight_kg: f64) -> Result<(), ReboundError> {
    if !WEIGHT_KG_RANGE.contains(&weight_kg) {
        return Err(invalid(
            "weightKg",
            format!(
                "must be between {} and {} kg",
                WEIGHT_KG_RANGE.start(),
                WEIGHT_KG_RANGE.end()
            ),
        ));
    }
    Ok(())
}

/// Validation helper for numeric fields with an inclusive range, used by the training metrics.
pub(crate) fn validate_range<T: PartialOrd + std::fmt::Display>(
    field: &str,
    value: T,
    range: RangeInclusive<T>,
) -> Result<(), ReboundError> {
    if !range.contains(&value) {
        return Err(invalid(
            field,
            format!("must be between {} and {}", range.start(), range.end()),
        ));
    }
    Ok(())
}

pub(crate) fn validate_non_negative(field: &str, value: f64) -> Result<(), ReboundError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, "must be a non-negative number"));
    }
    Ok(())
}
