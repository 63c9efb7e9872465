use std::fmt;
use thiserror::Error;

/// Cookie field checked against the header field-content charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CookieField {
    Name,
    Value,
    Path,
    Domain,
}

impl fmt::Display for CookieField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CookieField::Name => "name",
            CookieField::Value => "value",
            CookieField::Path => "path",
            CookieField::Domain => "domain",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CookieError {
    // Construction Errors
    #[error("Invalid field content in cookie {field}")]
    InvalidFieldContent { field: CookieField },

    // Scope Errors
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl CookieError {
    pub fn invalid_field(field: CookieField) -> Self {
        CookieError::InvalidFieldContent { field }
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        CookieError::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// The field that failed validation, if this is a construction error.
    pub fn field(&self) -> Option<CookieField> {
        match self {
            CookieError::InvalidFieldContent { field } => Some(*field),
            CookieError::InvalidUrl { .. } => None,
        }
    }
}
