//! Form validation & sanitization pipeline.
//!
//! Every rule is pure: it inspects raw form input, pushes field-level errors
//! into an accumulator, and returns the (possibly transformed) value. Rules
//! never short-circuit, so a single round-trip reports every problem on the
//! form. Nothing here touches the store.

use serde::Serialize;
use serde_json::Value;
use time::macros::format_description;
use time::Date;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulator for field errors across a whole form.
#[derive(Debug, Default)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }

    /// View-ready JSON array of `{field, message}` objects.
    pub fn to_bag(&self) -> Value {
        serde_json::to_value(&self.errors).unwrap_or_else(|_| Value::Array(vec![]))
    }

    /// Whether any error names the given field.
    pub fn names(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Require a non-empty value after trimming.
///
/// Returns the trimmed value either way so the caller can echo it back into a
/// re-rendered form.
pub fn required_trimmed(
    errors: &mut FormErrors,
    field: &str,
    raw: &str,
    message: &str,
) -> String {
    let trimmed = raw.trim().to_string();
    if trimmed.is_empty() {
        errors.push(field, message);
    }
    trimmed
}

/// Optional ISO-8601 (`YYYY-MM-DD`) date field.
///
/// A falsy value (empty or whitespace-only) is skipped without error; anything
/// else must parse.
pub fn optional_iso_date(errors: &mut FormErrors, field: &str, raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let format = format_description!("[year]-[month]-[day]");
    match Date::parse(raw, &format) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, "Invalid date");
            None
        }
    }
}

/// HTML-entity escape, applied to string fields before persistence.
///
/// Matches the escaping the rendered templates rely on: stored values can be
/// interpolated into markup without further treatment.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Require the value to be purely alphabetic once internal spaces are removed.
///
/// Lets multi-word names like "Science Fiction" through while rejecting
/// digits and punctuation.
pub fn alpha_when_despaced(errors: &mut FormErrors, field: &str, value: &str, message: &str) {
    let despaced: String = value.chars().filter(|c| *c != ' ').collect();
    if despaced.is_empty() || !despaced.chars().all(char::is_alphabetic) {
        errors.push(field, message);
    }
}
