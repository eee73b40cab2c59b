//! Local validation of fact submissions.
//!
//! # Responsibility
//! - Check a submission form before any gateway call.
//! - Provide the character counter shown next to the text input.
//!
//! # Invariants
//! - A draft that passes `validate` always satisfies the fact model:
//!   non-empty text of at most `MAX_TEXT_CHARS`, an http(s) source URL and a
//!   registry category.

use crate::model::category::is_valid_category;
use crate::model::fact::NewFact;
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// Maximum fact length in characters.
pub const MAX_TEXT_CHARS: usize = 200;

/// Rejection reason for a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactValidationError {
    EmptyText,
    TextTooLong { chars: usize, max: usize },
    InvalidSource(String),
    MissingCategory,
    UnknownCategory(String),
}

impl FactValidationError {
    /// Stable short code for logs; never includes user input.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyText => "empty_text",
            Self::TextTooLong { .. } => "text_too_long",
            Self::InvalidSource(_) => "invalid_source",
            Self::MissingCategory => "missing_category",
            Self::UnknownCategory(_) => "unknown_category",
        }
    }
}

impl Display for FactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "fact text must not be empty"),
            Self::TextTooLong { chars, max } => {
                write!(f, "fact text has {chars} characters; at most {max} allowed")
            }
            Self::InvalidSource(value) => {
                write!(f, "source `{value}` is not an http(s) URL")
            }
            Self::MissingCategory => write!(f, "category must be selected"),
            Self::UnknownCategory(value) => write!(f, "unknown category `{value}`"),
        }
    }
}

impl Error for FactValidationError {}

/// Raw submission form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactDraft {
    pub text: String,
    pub source: String,
    pub category: String,
}

impl FactDraft {
    pub fn new(
        text: impl Into<String>,
        source: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            category: category.into(),
        }
    }

    /// Validates the draft and converts it into an insert payload.
    ///
    /// Checks run in form order (text, source, category); the first failure
    /// is returned.
    pub fn validate(&self) -> Result<NewFact, FactValidationError> {
        if self.text.is_empty() {
            return Err(FactValidationError::EmptyText);
        }
        let chars = self.text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(FactValidationError::TextTooLong {
                chars,
                max: MAX_TEXT_CHARS,
            });
        }
        if !is_valid_http_url(&self.source) {
            return Err(FactValidationError::InvalidSource(self.source.clone()));
        }
        if self.category.is_empty() {
            return Err(FactValidationError::MissingCategory);
        }
        if !is_valid_category(&self.category) {
            return Err(FactValidationError::UnknownCategory(self.category.clone()));
        }

        Ok(NewFact {
            text: self.text.clone(),
            source: self.source.clone(),
            category: self.category.clone(),
        })
    }
}

/// Returns whether `value` parses as an absolute `http`/`https` URL.
pub fn is_valid_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Characters left before reaching `MAX_TEXT_CHARS`; negative when over.
pub fn remaining_chars(text: &str) -> i64 {
    let used = i64::try_from(text.chars().count()).unwrap_or(i64::MAX);
    MAX_TEXT_CHARS as i64 - used
}

#[cfg(test)]
mod tests {
    use super::{is_valid_http_url, remaining_chars, FactDraft, FactValidationError};

    #[test]
    fn url_check_accepts_only_http_schemes() {
        assert!(is_valid_http_url("http://x.com"));
        assert!(is_valid_http_url("https://x.com/a?b=c"));
        assert!(!is_valid_http_url("ftp://x"));
        assert!(!is_valid_http_url("not-a-url"));
        assert!(!is_valid_http_url("mailto:someone@example.com"));
        assert!(!is_valid_http_url(""));
    }

    #[test]
    fn remaining_chars_counts_down_and_goes_negative() {
        assert_eq!(remaining_chars(""), 200);
        assert_eq!(remaining_chars("abc"), 197);
        assert_eq!(remaining_chars(&"x".repeat(205)), -5);
    }

    #[test]
    fn length_limit_counts_characters_not_bytes() {
        let draft = FactDraft::new("é".repeat(200), "https://x.com", "science");
        assert!(draft.validate().is_ok());

        let draft = FactDraft::new("é".repeat(201), "https://x.com", "science");
        assert_eq!(
            draft.validate(),
            Err(FactValidationError::TextTooLong {
                chars: 201,
                max: 200
            })
        );
    }
}
