//! Construction error type.
//!
//! Building a request descriptor never touches the network, so the only way it
//! can fail is a contract violation by the caller. [`ConstructionError`]
//! describes which parameter was wrong and why.

/// Error returned when the supplied parameters cannot produce a well-formed
/// request descriptor.
///
/// All variants are local and non-retryable: calling the same builder again
/// with the same inputs fails the same way.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    /// A required string, byte buffer or list was empty.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// A value was present but structurally invalid.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Two optional parameters were supplied in a combination that has no
    /// meaning on the wire.
    #[error("conflicting {field}: {reason}")]
    Conflict { field: &'static str, reason: String },

    /// The JSON body could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// A header name or value could not be represented.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A URL could not be formed from the configured base and the request path.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The rendered parts were rejected when assembling the HTTP request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ConstructionError {
    /// Create an [`EmptyField`](ConstructionError::EmptyField) error.
    pub fn empty(field: &'static str) -> Self {
        ConstructionError::EmptyField { field }
    }

    /// Create an [`InvalidField`](ConstructionError::InvalidField) error.
    pub fn invalid<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConstructionError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Create a [`Conflict`](ConstructionError::Conflict) error.
    pub fn conflict<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConstructionError::Conflict {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending parameter, when the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConstructionError::EmptyField { field }
            | ConstructionError::InvalidField { field, .. }
            | ConstructionError::Conflict { field, .. } => Some(field),
            ConstructionError::Encode(_)
            | ConstructionError::InvalidHeader(_)
            | ConstructionError::InvalidUrl(_)
            | ConstructionError::InvalidRequest(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConstructionError {
    fn from(err: serde_json::Error) -> Self {
        ConstructionError::Encode(format!("JSON encoding failed: {}", err))
    }
}

impl From<http::header::InvalidHeaderValue> for ConstructionError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        ConstructionError::InvalidHeader(err.to_string())
    }
}

impl From<http::Error> for ConstructionError {
    fn from(err: http::Error) -> Self {
        ConstructionError::InvalidRequest(err.to_string())
    }
}

/// Reject an empty string or byte slice.
pub fn require_non_empty<T: AsRef<[u8]> + ?Sized>(
    field: &'static str,
    value: &T,
) -> Result<(), ConstructionError> {
    if value.as_ref().is_empty() {
        return Err(ConstructionError::empty(field));
    }
    Ok(())
}

/// Reject a value that cannot be placed in a single path segment.
///
/// Path parameters are inserted verbatim, so a value that a URL parser would
/// split, escape-decode, or collapse as a dot segment is refused: empty, `.`,
/// `..`, anything containing `/`, `\`, `?`, `#` or `%`, and whitespace or
/// control characters.
pub fn require_path_segment(field: &'static str, value: &str) -> Result<(), ConstructionError> {
    require_non_empty(field, value)?;
    if value == "." || value == ".." {
        return Err(ConstructionError::invalid(
            field,
            format!("{:?} is a dot segment", value),
        ));
    }
    let forbidden = |c: &char| {
        matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    };
    if let Some(c) = value.chars().find(forbidden) {
        return Err(ConstructionError::invalid(
            field,
            format!("{:?} is not allowed in a path segment", c),
        ));
    }
    Ok(())
}

/// Reject a basic auth username that is empty or contains `:`.
///
/// The first `:` separates username from password, so a username containing
/// one would be read back as a different credential pair.
pub fn require_basic_username(field: &'static str, value: &str) -> Result<(), ConstructionError> {
    require_non_empty(field, value)?;
    if value.contains(':') {
        return Err(ConstructionError::invalid(
            field,
            "':' is not allowed in a basic auth username",
        ));
    }
    Ok(())
}
