//! Error types for the catalog.
//!
//! Every layer has its own `thiserror` enum; [`CatalogError`] is the
//! caller-facing type returned by the catalog and the reseed coordinator.
//! Internal causes are logged where they are swallowed and never rendered
//! into a caller-facing message.

use thiserror::Error;

use crate::seed::SourceError;

/// Validation errors raised before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("pokemon number must be a positive integer, got {value}")]
    NonPositiveNumber {
        value: i64,
    },

    #[error("pokemon name must have at least 1 character")]
    EmptyName,

    #[error("{field} must be a positive integer")]
    NonPositiveLimit {
        field: &'static str,
    },
}

/// Top-level error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No pokemon matched the term.
    #[error("pokemon with id, name or no: {term} not found")]
    NotFound {
        term: String,
    },

    /// A create collided with an existing `no` and/or `name`.
    #[error("pokemon already exists in the catalog: {fields}")]
    AlreadyExists {
        fields: String,
    },

    /// An update collided with another record's `no` or `name`.
    #[error("pokemon property already exists on another record")]
    PropertyTaken,

    /// A delete by storage id removed nothing.
    #[error("pokemon with id: {id:?} not found")]
    NothingDeleted {
        id: String,
    },

    /// The external source failed or returned unusable data.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Unclassified failure; details were logged, not exposed.
    #[error("{message}")]
    Internal {
        message: String,
    },
}

impl CatalogError {
    /// Creates an internal error carrying only a caller-safe message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true for resolution misses.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for the conflict class: uniqueness violations and
    /// deletes that matched nothing.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists { .. } | Self::PropertyTaken | Self::NothingDeleted { .. }
        )
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// HTTP status a transport layer should answer with.
    ///
    /// Conflicts are request errors (400), including a delete that removed
    /// nothing; only resolution misses are 404.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::AlreadyExists { .. }
            | Self::PropertyTaken
            | Self::NothingDeleted { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Source(_) => 502,
            Self::Internal { .. } => 500,
        }
    }
}

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
