//! Login identifier validation shared by the client forms and the service.
//!
//! These checks are shape-only. Anything that passes here may still be
//! rejected by the authorization gate; anything that fails here must never
//! reach the network.

use serde::{Deserialize, Serialize};

/// A syntactically valid login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identifier {
    Phone(String),
    Email(String),
}

impl Identifier {
    /// Classify and validate a raw submission. Whitespace is trimmed;
    /// phones keep only their leading `+` and digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.contains('@') {
            return is_valid_email(trimmed).then(|| Self::Email(trimmed.to_ascii_lowercase()));
        }
        let normalized = normalize_phone(trimmed);
        is_valid_phone(&normalized).then_some(Self::Phone(normalized))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Phone(s) | Self::Email(s) => s,
        }
    }
}

/// Strip separators commonly typed into phone fields, keeping `+` and digits.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// E.164-like: a leading `+` followed by 8 to 15 digits.
pub fn is_valid_phone(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('+') else {
        return false;
    };
    (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Minimal structural check: one `@`, non-empty local part, domain with a dot.
pub fn is_valid_email(s: &str) -> bool {
    let mut parts = s.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
}

/// National tax id: exactly 11 digits after stripping `.` and `-` separators.
pub fn is_valid_tax_id(raw: &str) -> bool {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let separators_only = raw
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    separators_only && digits.len() == 11
}
