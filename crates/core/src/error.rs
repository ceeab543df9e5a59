//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. `Validation`
/// and `InvariantViolation` are the only failures the metrics engine and the
/// aggregation service produce; `InvalidId` and `NotFound` belong to the
/// catalog collaborators that look items up on behalf of an owner.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Caller-supplied input broke a rule. The message names the rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A contract between components was broken (e.g. an item that never went
    /// through the metrics engine reached aggregation).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested item was not found for the requesting owner.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Whether the caller can recover by correcting its request.
    ///
    /// Invariant violations are integration bugs and should surface as
    /// internal errors instead.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }

    /// The bare reason, without the variant prefix added by `Display`.
    pub fn reason(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::InvariantViolation(msg) | Self::InvalidId(msg) => msg,
            Self::NotFound => "not found",
        }
    }
}
