use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::domain::ProductId;

/// Validation errors raised by domain type constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
}

/// Upstream call failure classification.
///
/// `CircuitOpen` means the endpoint is temporarily excluded, not that the
/// request itself failed; callers should treat it as "try later".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    CircuitOpen,
    Timeout,
    Network,
    Transform,
    Internal,
}

/// Structured error for external source calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn circuit_open(endpoint: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::CircuitOpen,
            message: format!("circuit breaker is open for '{}'", endpoint.into()),
            retryable: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Timeout,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Network,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn transform(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Transform,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Transient failures (timeouts, transport errors) are eligible for retry.
    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::CircuitOpen => "source.circuit_open",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::Network => "source.network",
            SourceErrorKind::Transform => "source.transform",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Errors raised by single-entity comparison operations.
///
/// Batch operations (sync, price sweep) never raise these; they accumulate
/// structured error lists instead.
#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("product {id} not found")]
    ProductNotFound { id: ProductId },

    #[error("at least 2 resolvable products are required for comparison, found {found}")]
    InsufficientProducts { found: usize },

    #[error("no in-stock quote available for product {id}")]
    NoInStockQuote { id: ProductId },

    #[error(transparent)]
    Source(#[from] SourceError),
}
