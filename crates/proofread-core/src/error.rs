//! Error types for proofreading issue generation.

use crate::models::ContentKind;
use crate::validator::ValidationFailure;
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while looking up content or deriving issues.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more request fields are missing or malformed.
    #[error("invalid request: {0}")]
    Validation(ValidationFailure),

    /// A referenced content item or language is not in the catalog.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// No issue template is registered for a kind.
    #[error("no issue template registered for kind '{0}'")]
    UnknownKind(ContentKind),

    /// A template refers to a value the input cannot provide.
    #[error("template error: {0}")]
    Template(String),

    /// A collaborator could not be reached or did not answer in time.
    #[error("{operation} unavailable: {detail}")]
    UpstreamUnavailable { operation: &'static str, detail: String },

    /// A collaborator answered with an application-level error.
    #[error("{operation} rejected: {detail}")]
    UpstreamRejected { operation: &'static str, detail: String },
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            what,
            id: id.into(),
        }
    }

    /// Shorthand for [`Error::UpstreamUnavailable`].
    pub fn unavailable(operation: &'static str, detail: impl ToString) -> Self {
        Error::UpstreamUnavailable {
            operation,
            detail: detail.to_string(),
        }
    }

    /// Shorthand for [`Error::UpstreamRejected`].
    pub fn rejected(operation: &'static str, detail: impl ToString) -> Self {
        Error::UpstreamRejected {
            operation,
            detail: detail.to_string(),
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::UpstreamUnavailable { .. })
    }

    /// Whether this is a programming or configuration error rather than
    /// something the user can fix.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::UnknownKind(_) | Error::Template(_))
    }
}

impl From<ValidationFailure> for Error {
    /// A failure made only of missing catalog references is a `NotFound`;
    /// anything else is a validation error carrying every field.
    fn from(failure: ValidationFailure) -> Self {
        match failure.only_not_found() {
            Some((what, first)) => Error::NotFound {
                what,
                id: first.value.clone(),
            },
            None => Error::Validation(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_only_when_unavailable() {
        assert!(Error::unavailable("list branches", "timed out").is_retryable());
        assert!(!Error::rejected("create issue", "bad credentials").is_retryable());
        assert!(!Error::not_found("course", "btc101").is_retryable());
    }

    #[test]
    fn internal_errors() {
        assert!(Error::UnknownKind(ContentKind::Weblate).is_internal());
        assert!(Error::Template("missing {uuid}".into()).is_internal());
        assert!(!Error::not_found("language", "xx").is_internal());
    }

    #[test]
    fn messages_carry_context() {
        let err = Error::rejected("create issue", "401 Bad credentials");
        assert_eq!(err.to_string(), "create issue rejected: 401 Bad credentials");

        let err = Error::not_found("course", "btc999");
        assert_eq!(err.to_string(), "course not found: btc999");
    }
}
