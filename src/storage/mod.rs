//! Storage layer for the catalog.
//!
//! The trait defines the document-store contract; `memory` provides the
//! in-process backend used by tests, benches and the CLI.

mod memory;
mod traits;

pub use memory::InMemoryPokemonStore;
pub use traits::{
    describe_keys, DeleteOutcome, Filter, PokemonStore, StorageError, UniqueKey, UpdateOutcome,
};
