//! Bulk reseeding of the catalog.
//!
//! A reseed is a full replace: truncate, fetch, bulk insert. The steps are
//! not atomic. A failure after the truncate leaves the catalog empty (or
//! however the failing step left it), and callers running creates, updates
//! or another reseed concurrently may see a transiently empty catalog or
//! lose their writes.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::catalog::{map_storage_error, Operation};
use crate::config::CatalogConfig;
use crate::error::{CatalogResult, ValidationError};
use crate::pokemon::{normalize_name, Pokemon};
use crate::seed::source::{PokemonSource, SourceRecord};
use crate::storage::{Filter, PokemonStore};

/// Status reported for a completed reseed.
pub const SEED_MESSAGE: &str = "seed executed";

/// Summary of a completed reseed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReseedReport {
    /// Records removed by the truncate.
    pub removed: u64,
    /// Records written by the bulk insert.
    pub inserted: usize,
    /// When the truncate started.
    pub started_at: DateTime<Utc>,
    /// When the bulk insert finished.
    pub finished_at: DateTime<Utc>,
}

impl fmt::Display for ReseedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SEED_MESSAGE)
    }
}

/// Replaces the catalog with a page of the external source.
#[derive(Clone)]
pub struct Reseeder {
    store: Arc<dyn PokemonStore>,
    source: Arc<dyn PokemonSource>,
    page_size: usize,
}

impl Reseeder {
    /// Create a reseeder pulling `page_size` records per run.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `page_size` is zero.
    pub fn new(
        store: Arc<dyn PokemonStore>,
        source: Arc<dyn PokemonSource>,
        page_size: usize,
    ) -> Result<Self, ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::NonPositiveLimit { field: "page_size" });
        }
        Ok(Self {
            store,
            source,
            page_size,
        })
    }

    /// Create a reseeder using `config.seed_limit` as the page size.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the configured limit is zero.
    pub fn with_config(
        store: Arc<dyn PokemonStore>,
        source: Arc<dyn PokemonSource>,
        config: &CatalogConfig,
    ) -> Result<Self, ValidationError> {
        Self::new(store, source, config.seed_limit)
    }

    /// Records requested from the source per run.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Truncate the catalog and repopulate it from the source.
    ///
    /// Names are normalized on the way in, like single creates.
    ///
    /// # Errors
    ///
    /// - `Source` if the fetch fails or a reference has no numeric id
    /// - `AlreadyExists` if the page repeats a number or name
    /// - `Internal` for any other store failure (logged)
    ///
    /// Errors after the truncate leave the catalog empty.
    pub fn reseed(&self) -> CatalogResult<ReseedReport> {
        let started_at = Utc::now();

        let removed = self
            .store
            .delete_many(&Filter::All)
            .map_err(|e| map_storage_error(Operation::Seed, e))?
            .deleted_count;
        info!("reseed: removed {removed} pokemon");

        let records = self.source.fetch(self.page_size)?;
        let batch = records
            .iter()
            .map(to_pokemon)
            .collect::<Result<Vec<_>, _>>()?;

        let inserted = self
            .store
            .insert_many(batch)
            .map_err(|e| map_storage_error(Operation::Seed, e))?;
        info!("reseed: inserted {inserted} pokemon");

        Ok(ReseedReport {
            removed,
            inserted,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

impl fmt::Debug for Reseeder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reseeder")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

fn to_pokemon(record: &SourceRecord) -> Result<Pokemon, crate::seed::SourceError> {
    Ok(Pokemon::new(record.no()?, normalize_name(&record.name)))
}
