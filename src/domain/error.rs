use std::fmt;

/// Recoverable rule violations raised by the domain layer.
///
/// Every variant is scoped to the single operation that triggered it and is
/// surfaced verbatim to the caller; nothing here is retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed quiz or question input.
    Validation(String),
    /// A referenced quiz or question does not exist.
    NotFound(&'static str),
    /// The actor lacks authorship for a protected operation.
    Forbidden(&'static str),
    /// The operation is invalid for the current lifecycle state.
    StateConflict(&'static str),
    /// A submission does not line up with the quiz being scored.
    MalformedSubmission(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::Forbidden(msg) => write!(f, "{msg}"),
            Self::StateConflict(msg) => write!(f, "{msg}"),
            Self::MalformedSubmission(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
