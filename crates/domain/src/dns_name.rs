//! Domain name label handling.
//!
//! Names are split on `.` into labels, leftmost label first. The empty name
//! and `"."` are the root and yield no labels. One trailing dot is accepted
//! so that FQDN and relative spellings split identically.

use crate::DomainError;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 253;

/// Splits `name` into its labels, preserving order and case.
pub fn labels_of(name: &str) -> Result<Vec<&str>, DomainError> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.len() > MAX_NAME_LEN {
        return Err(DomainError::MalformedName(format!(
            "name exceeds {} characters",
            MAX_NAME_LEN
        )));
    }

    let mut labels = Vec::new();
    for label in trimmed.split('.') {
        validate_label(label, name)?;
        labels.push(label);
    }

    Ok(labels)
}

/// Returns the leftmost (most specific) label, or `None` for the root.
pub fn first_label(name: &str) -> Result<Option<&str>, DomainError> {
    Ok(labels_of(name)?.into_iter().next())
}

/// Case-insensitive prefix test on a single label.
pub fn label_starts_with(label: &str, prefix: &str) -> bool {
    label.len() >= prefix.len()
        && label.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Validates that `label` could appear as a label (or label prefix).
pub fn validate_label(label: &str, name: &str) -> Result<(), DomainError> {
    if label.is_empty() {
        return Err(DomainError::MalformedName(format!(
            "empty label in '{}'",
            name
        )));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(DomainError::MalformedName(format!(
            "label '{}' exceeds {} characters",
            label, MAX_LABEL_LEN
        )));
    }
    if let Some(c) = label.chars().find(|c| !is_label_char(*c)) {
        return Err(DomainError::MalformedName(format!(
            "invalid character {:?} in '{}'",
            c, name
        )));
    }
    Ok(())
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '*'
}
