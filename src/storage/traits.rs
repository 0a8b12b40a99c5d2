//! Abstract storage contract for the catalog.
//!
//! The catalog only needs a document collection keyed by storage id with
//! unique indexes on `no` and `name`. Backends must report uniqueness
//! violations as [`StorageError::DuplicateKey`] so callers can tell them
//! apart from every other failure.

use std::fmt;

use thiserror::Error;

use crate::pokemon::{Pokemon, PokemonChanges, PokemonId};

/// A value that collided with a unique index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UniqueKey {
    /// Catalog number index.
    No(u32),
    /// Name index.
    Name(String),
}

impl UniqueKey {
    /// Name of the indexed field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::No(_) => "no",
            Self::Name(_) => "name",
        }
    }
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::No(no) => write!(f, "no={no}"),
            Self::Name(name) => write!(f, "name={name:?}"),
        }
    }
}

/// Renders colliding keys as `no=1, name="bulbasaur"`.
#[must_use]
pub fn describe_keys(keys: &[UniqueKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// One or more unique indexes rejected the write.
    #[error("Duplicate key: {}", describe_keys(.0))]
    DuplicateKey(Vec<UniqueKey>),

    /// A lock guarding backend state was poisoned.
    #[error("poisoned lock: {0}")]
    LockPoisoned(&'static str),

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

impl StorageError {
    /// Returns true for uniqueness violations.
    #[must_use]
    pub const fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }
}

/// Record selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every record.
    All,
    /// Exact storage id.
    Id(PokemonId),
    /// Exact catalog number.
    No(u32),
    /// Exact stored name (no normalization is applied by the store).
    Name(String),
}

impl Filter {
    /// Returns true if `pokemon` satisfies the filter.
    #[must_use]
    pub fn matches(&self, pokemon: &Pokemon) -> bool {
        match self {
            Self::All => true,
            Self::Id(id) => pokemon.id == *id,
            Self::No(no) => pokemon.no == *no,
            Self::Name(name) => pokemon.name == *name,
        }
    }
}

/// Acknowledgement of an `update_one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Records matched by the filter (0 or 1).
    pub matched: u64,
    /// Records whose fields actually changed (0 or 1).
    pub modified: u64,
}

/// Acknowledgement of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    /// Records removed.
    pub deleted_count: u64,
}

/// Storage trait for pokemon records.
///
/// # Safety Considerations
/// - Every single-record write is atomic with respect to the unique indexes
/// - `insert_many` either writes the whole batch or nothing
/// - No operation spans more than one call; callers own multi-step sequences
pub trait PokemonStore: Send + Sync {
    /// Insert one record. Fails with `DuplicateKey` on any index collision.
    fn insert_one(&self, pokemon: Pokemon) -> Result<Pokemon, StorageError>;

    /// Insert a batch. Fails with `DuplicateKey` if any record collides with
    /// the store or with another record of the batch; nothing is written then.
    fn insert_many(&self, batch: Vec<Pokemon>) -> Result<usize, StorageError>;

    /// First record matching the filter, in ascending `no` order.
    fn find_one(&self, filter: &Filter) -> Result<Option<Pokemon>, StorageError>;

    /// Record with the given storage id.
    fn find_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>, StorageError>;

    /// Records matching the filter in ascending `no` order, after skipping
    /// `skip` and returning at most `limit`.
    fn find(
        &self,
        filter: &Filter,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Pokemon>, StorageError>;

    /// Apply `changes` to the first record matching the filter.
    fn update_one(
        &self,
        filter: &Filter,
        changes: &PokemonChanges,
    ) -> Result<UpdateOutcome, StorageError>;

    /// Delete the first record matching the filter.
    fn delete_one(&self, filter: &Filter) -> Result<DeleteOutcome, StorageError>;

    /// Delete every record matching the filter.
    fn delete_many(&self, filter: &Filter) -> Result<DeleteOutcome, StorageError>;

    /// Number of records matching the filter.
    fn count(&self, filter: &Filter) -> Result<usize, StorageError>;
}
