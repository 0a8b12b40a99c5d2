//! Translation of storage failures into caller-facing errors.

use log::error;

use crate::error::CatalogError;
use crate::storage::{describe_keys, StorageError};

/// The catalog operation a storage failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Term resolution or listing.
    Find,
    /// Single insert.
    Create,
    /// Patch of a resolved record.
    Update,
    /// Delete by storage id.
    Remove,
    /// Truncate or bulk insert during a reseed.
    Seed,
}

impl Operation {
    /// Caller-safe message for unclassified failures.
    #[must_use]
    pub const fn internal_message(self) -> &'static str {
        match self {
            Self::Find => "could not look up pokemon, check server logs",
            Self::Create => "could not create pokemon, check server logs",
            Self::Update => "pokemon could not be updated",
            Self::Remove => "could not delete pokemon, check server logs",
            Self::Seed => "could not seed the catalog, check server logs",
        }
    }
}

/// Maps a storage failure raised during `op` to a [`CatalogError`].
///
/// Uniqueness violations become conflicts: create and seed name the
/// colliding fields, update only reports that a property is taken. Every
/// other failure is logged and surfaces as a generic internal error.
#[must_use]
pub fn map_storage_error(op: Operation, err: StorageError) -> CatalogError {
    match (op, err) {
        (Operation::Create | Operation::Seed, StorageError::DuplicateKey(keys)) => {
            CatalogError::AlreadyExists {
                fields: describe_keys(&keys),
            }
        }
        (Operation::Update, StorageError::DuplicateKey(_)) => CatalogError::PropertyTaken,
        (op, err) => {
            error!("{op:?} failed in storage: {err}");
            CatalogError::internal(op.internal_message())
        }
    }
}
