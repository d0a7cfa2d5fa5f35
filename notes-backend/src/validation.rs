//! Field-level validation for inbound request records.
//!
//! Every check returns a [`ValidationError`] naming the offending field. Lengths
//! are counted in characters, not bytes.

use regex::Regex;
use std::sync::LazyLock;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MAX_CHARS: usize = 10_000;
pub const TAG_MAX_CHARS: usize = 30;
pub const DEFAULT_COLOR: &str = "#ffffff";

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn required(field: &'static str) -> Self {
        Self::new(field, format!("\"{}\" is required", field))
    }

    fn empty(field: &'static str) -> Self {
        Self::new(field, format!("\"{}\" is not allowed to be empty", field))
    }

    fn too_long(field: &'static str, max: usize) -> Self {
        Self::new(
            field,
            format!("\"{}\" length must be less than or equal to {} characters long", field, max),
        )
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// A required, trimmed, non-empty string no longer than `max` characters.
pub fn required_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::required(field))?;
    bounded_text(field, value, max)
}

/// A non-empty string no longer than `max` characters, returned trimmed.
/// The bound applies to the value as sent, surrounding whitespace included.
pub fn bounded_text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty(field));
    }
    if char_len(value) > max {
        return Err(ValidationError::too_long(field, max));
    }
    Ok(trimmed.to_string())
}

/// Note content keeps its surrounding whitespace; only blank content is rejected.
pub fn note_content(value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty("content"));
    }
    if char_len(value) > CONTENT_MAX_CHARS {
        return Err(ValidationError::too_long("content", CONTENT_MAX_CHARS));
    }
    Ok(value.to_string())
}

/// Trims each tag; a blank tag is rejected. Order is preserved.
pub fn tags(values: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        let tag = value.trim();
        if tag.is_empty() {
            return Err(ValidationError::new(
                "tags",
                "\"tags\" items are not allowed to be empty",
            ));
        }
        if char_len(value) > TAG_MAX_CHARS {
            return Err(ValidationError::new(
                "tags",
                format!(
                    "\"tags\" items must be less than or equal to {} characters long",
                    TAG_MAX_CHARS
                ),
            ));
        }
        out.push(tag.to_string());
    }
    Ok(out)
}

/// `#` followed by six hex digits, either case.
pub fn color(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if !COLOR_RE.is_match(value) {
        return Err(ValidationError::new(
            "color",
            format!("\"color\" must be a hex color like {}", DEFAULT_COLOR),
        ));
    }
    Ok(value.to_string())
}

pub fn display_name(value: Option<&str>) -> Result<String, ValidationError> {
    let name = required_text("name", value, NAME_MAX_CHARS)?;
    if char_len(&name) < NAME_MIN_CHARS {
        return Err(ValidationError::new(
            "name",
            format!("\"name\" length must be at least {} characters long", NAME_MIN_CHARS),
        ));
    }
    Ok(name)
}

/// Returns the canonical (trimmed, lowercased) form of the address.
pub fn email(value: Option<&str>) -> Result<String, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::required("email"))?.trim();
    if value.is_empty() {
        return Err(ValidationError::empty("email"));
    }
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::new("email", "\"email\" must be a valid email"));
    }
    Ok(value.to_lowercase())
}

/// Registration password. Never trimmed.
pub fn new_password(value: Option<&str>) -> Result<String, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::required("password"))?;
    if char_len(value) < PASSWORD_MIN_CHARS {
        return Err(ValidationError::new(
            "password",
            format!(
                "\"password\" length must be at least {} characters long",
                PASSWORD_MIN_CHARS
            ),
        ));
    }
    Ok(value.to_string())
}

/// Login password: only presence is checked.
pub fn password(value: Option<&str>) -> Result<String, ValidationError> {
    match value {
        None => Err(ValidationError::required("password")),
        Some("") => Err(ValidationError::empty("password")),
        Some(v) => Ok(v.to_string()),
    }
}
