//! Single-record catalog operations.
//!
//! [`PokemonCatalog`] normalizes input, delegates uniqueness to the store's
//! indexes and translates store failures through
//! [`map_storage_error`](crate::catalog::map_storage_error).

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::catalog::errors::{map_storage_error, Operation};
use crate::catalog::resolver::Resolver;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult, ValidationError};
use crate::pokemon::{NewPokemon, Pokemon, PokemonId, PokemonPatch};
use crate::storage::{Filter, PokemonStore};

/// Confirmation returned by [`PokemonCatalog::remove`].
pub const DELETED_MESSAGE: &str = "pokemon was deleted";

/// Listing window for [`PokemonCatalog::find_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page size; the catalog default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Records to skip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Pagination {
    /// A window of `limit` records starting at `offset`.
    #[must_use]
    pub const fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }
}

/// Catalog service: create, find, update and remove pokemon.
#[derive(Clone)]
pub struct PokemonCatalog {
    store: Arc<dyn PokemonStore>,
    resolver: Resolver,
    default_limit: usize,
}

impl PokemonCatalog {
    /// Create a catalog over `store` with the default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn PokemonStore>) -> Self {
        Self::with_config(store, &CatalogConfig::default())
    }

    /// Create a catalog over `store` using `config` for listing defaults.
    #[must_use]
    pub fn with_config(store: Arc<dyn PokemonStore>, config: &CatalogConfig) -> Self {
        Self {
            resolver: Resolver::new(Arc::clone(&store)),
            store,
            default_limit: config.default_limit,
        }
    }

    /// The resolver used by [`PokemonCatalog::find_one`] and
    /// [`PokemonCatalog::update`].
    #[must_use]
    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Insert a new pokemon with a normalized name.
    ///
    /// # Errors
    ///
    /// - `Validation` if `no` is not positive or the name is blank
    /// - `AlreadyExists` naming the colliding field(s)
    /// - `Internal` for any other store failure (logged)
    pub fn create(&self, input: &NewPokemon) -> CatalogResult<Pokemon> {
        let (no, name) = input.validate()?;
        let created = self
            .store
            .insert_one(Pokemon::new(no, name))
            .map_err(|e| map_storage_error(Operation::Create, e))?;
        debug!("created pokemon {} (no={}, name={:?})", created.id, created.no, created.name);
        Ok(created)
    }

    /// List pokemon in ascending `no` order.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a zero limit, `Internal` on store failure.
    pub fn find_all(&self, page: Pagination) -> CatalogResult<Vec<Pokemon>> {
        let limit = page.limit.unwrap_or(self.default_limit);
        if limit == 0 {
            return Err(ValidationError::NonPositiveLimit { field: "limit" }.into());
        }
        self.store
            .find(&Filter::All, page.offset.unwrap_or(0), limit)
            .map_err(|e| map_storage_error(Operation::Find, e))
    }

    /// Resolve `term` (number, storage id or name) to one pokemon.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn find_one(&self, term: &str) -> CatalogResult<Pokemon> {
        self.resolver.resolve(term)
    }

    /// Patch the pokemon `term` resolves to.
    ///
    /// The returned record is the resolved snapshot overlaid with the
    /// normalized patch, not a re-read of the stored record. A concurrent
    /// writer between resolution and write is not reflected.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `term` resolves to nothing
    /// - `Validation` for a zero `no` or a blank name
    /// - `PropertyTaken` if the patch collides with another record
    /// - `Internal` for any other store failure (logged)
    pub fn update(&self, term: &str, patch: &PokemonPatch) -> CatalogResult<Pokemon> {
        let snapshot = self.resolver.resolve(term)?;
        let changes = patch.normalized()?;

        let outcome = self
            .store
            .update_one(&Filter::Id(snapshot.id), &changes)
            .map_err(|e| map_storage_error(Operation::Update, e))?;
        if outcome.matched == 0 {
            debug!("pokemon {} disappeared before its update was applied", snapshot.id);
        }

        Ok(changes.apply_to(&snapshot))
    }

    /// Delete by storage id.
    ///
    /// Only storage ids are accepted; numbers and names are not resolved.
    /// The id must match exactly, surrounding whitespace included.
    ///
    /// # Errors
    ///
    /// - `NothingDeleted` if `id` is not a storage id or matches no record
    /// - `Internal` for a store failure (logged)
    pub fn remove(&self, id: &str) -> CatalogResult<&'static str> {
        let nothing_deleted = || CatalogError::NothingDeleted { id: id.to_string() };

        let parsed: PokemonId = PokemonId::parse(id).ok_or_else(nothing_deleted)?;
        let outcome = self
            .store
            .delete_one(&Filter::Id(parsed))
            .map_err(|e| map_storage_error(Operation::Remove, e))?;

        if outcome.deleted_count == 0 {
            return Err(nothing_deleted());
        }
        info!("deleted pokemon {parsed}");
        Ok(DELETED_MESSAGE)
    }
}

impl std::fmt::Debug for PokemonCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokemonCatalog")
            .field("default_limit", &self.default_limit)
            .finish_non_exhaustive()
    }
}
