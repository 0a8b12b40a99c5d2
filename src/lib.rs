//! # Pokedex - a Pokemon catalog with free-form lookups
//!
//! Pokedex keeps a catalog of pokemon, each identified by a store-assigned
//! storage id, a positive catalog number and a unique name, and resolves
//! loosely-typed terms to exactly one record.
//!
//! ## Core Concepts
//!
//! - **Term**: a caller-supplied identifier that may be a number, a storage id or a name
//! - **Normalization**: names are trimmed and lowercased before every write and lookup
//! - **Conflict**: a uniqueness violation, or a delete that removed nothing
//! - **Reseed**: truncate-and-repopulate from an external catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pokedex::{InMemoryPokemonStore, NewPokemon, PokemonCatalog};
//!
//! let catalog = PokemonCatalog::new(Arc::new(InMemoryPokemonStore::new()));
//! let bulbasaur = catalog.create(&NewPokemon::new(1, "Bulbasaur"))?;
//! assert_eq!(catalog.find_one("BULBASAUR")?.id, bulbasaur.id);
//! assert_eq!(catalog.find_one("1")?.id, bulbasaur.id);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod pokemon;
pub mod seed;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use catalog::{Pagination, PokemonCatalog, Resolver, TermKind, DELETED_MESSAGE};
pub use config::{CatalogConfig, ConfigError};
pub use error::{CatalogError, CatalogResult, ValidationError};
pub use pokemon::{
    normalize_name, NewPokemon, Pokemon, PokemonChanges, PokemonId, PokemonPatch,
};
#[cfg(feature = "http-source")]
pub use seed::HttpPokemonSource;
pub use seed::{
    PokemonSource, ReseedReport, Reseeder, SourceError, SourceRecord, StaticSource, SEED_MESSAGE,
};
pub use storage::{Filter, InMemoryPokemonStore, PokemonStore, StorageError, UniqueKey};
