//! Field-level payload validation.
//!
//! Handlers deserialize a loose payload struct, then resolve it against the
//! record's constraints here. Every violation is collected into a
//! [`FieldErrors`] map so the caller sees all problems at once, mirroring the
//! flat `{"field": ["message", ...]}` shape of the 400 body.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Accumulated validation errors, keyed by field name.
#[derive(Debug, Default, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Finish a validation pass: `Err(AppError::Validation)` if anything was collected.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(|k| k.as_str()).collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// Deserialize helper distinguishing an absent field from an explicit `null`.
/// `None` = absent, `Some(None)` = null, `Some(Some(v))` = value.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Resolve a required text field: present values are checked for blankness and
/// length; absent values fall back to the current record only on partial
/// updates, otherwise the field is reported missing.
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    provided: Option<String>,
    current: Option<&str>,
    partial: bool,
    max_len: usize,
) -> String {
    match provided {
        Some(value) => {
            if value.is_empty() {
                errors.add(field, "This field may not be blank.");
            } else if max_len > 0 && value.chars().count() > max_len {
                errors.add(
                    field,
                    format!("Ensure this field has no more than {max_len} characters."),
                );
            }
            value
        }
        None => match current {
            Some(value) if partial => value.to_string(),
            _ => {
                errors.add(field, "This field is required.");
                String::new()
            }
        },
    }
}

/// Resolve an optional text field (stored as an empty string when unset).
pub fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    provided: Option<String>,
    current: Option<&str>,
    max_len: usize,
) -> String {
    match provided {
        Some(value) => {
            if max_len > 0 && value.chars().count() > max_len {
                errors.add(
                    field,
                    format!("Ensure this field has no more than {max_len} characters."),
                );
            }
            value
        }
        None => current.unwrap_or_default().to_string(),
    }
}

pub fn check_email(errors: &mut FieldErrors, field: &str, value: &str) {
    if !value.is_empty() && !EMAIL_RE.is_match(value) {
        errors.add(field, "Enter a valid email address.");
    }
}

/// Parse a status string into its closed enum, recording a choice error on failure.
pub fn parse_choice<T: FromStr>(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<T> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, format!("\"{raw}\" is not a valid choice."));
            None
        }
    }
}

/// Parse a budget value (JSON number or string) into a decimal constrained to
/// 10 digits total with 2 decimal places.
pub fn parse_budget(raw: &Value) -> Result<Decimal, String> {
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err("A valid number is required.".to_string()),
    };

    let value = Decimal::from_str(&text).map_err(|_| "A valid number is required.".to_string())?;

    let decimals = value.scale() as usize;
    if decimals > 2 {
        return Err("Ensure that there are no more than 2 decimal places.".to_string());
    }

    let digits = value.mantissa().unsigned_abs().to_string().len();
    if digits > 10 {
        return Err("Ensure that there are no more than 10 digits in total.".to_string());
    }
    if digits.saturating_sub(decimals) > 8 {
        return Err(
            "Ensure that there are no more than 8 digits before the decimal point.".to_string(),
        );
    }

    Ok(value)
}
