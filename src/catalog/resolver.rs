//! Free-form term resolution.
//!
//! A term may be a catalog number, a storage id or a name. The resolver
//! tries each interpretation in a fixed order and falls through whenever a
//! lookup finds nothing, so a numeric-looking term that matches no `no` is
//! still tried as a storage id and as a name.

use std::sync::Arc;

use log::debug;

use crate::catalog::errors::{map_storage_error, Operation};
use crate::error::{CatalogError, CatalogResult};
use crate::pokemon::{normalize_name, Pokemon, PokemonId};
use crate::storage::{Filter, PokemonStore};

/// One way of reading a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    /// Catalog number.
    No,
    /// Store-assigned storage id.
    StorageId,
    /// Normalized name.
    Name,
}

impl TermKind {
    /// Resolution order; the first lookup that finds a record wins.
    pub const ORDER: [Self; 3] = [Self::No, Self::StorageId, Self::Name];

    /// The store filter for `term` under this reading, or `None` if the
    /// term cannot be read this way.
    #[must_use]
    pub fn filter_for(self, term: &str) -> Option<Filter> {
        match self {
            Self::No => parse_catalog_no(term).map(Filter::No),
            Self::StorageId => PokemonId::parse(term.trim()).map(Filter::Id),
            Self::Name => Some(Filter::Name(normalize_name(term))),
        }
    }
}

/// Reads a term as a number the way a JavaScript `Number(term)` does.
///
/// Accepts surrounding whitespace, a sign, decimal fractions and exponents
/// (`25`, `+25`, `25.0`, `2.5e1`) and `0x`/`0o`/`0b` integer literals. Only
/// finite integral values in the `u32` range can match a record; anything
/// else is not a catalog number.
fn parse_catalog_no(term: &str) -> Option<u32> {
    let term = term.trim();

    let radix = term.get(..2).and_then(|prefix| match prefix {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    });
    if let Some(radix) = radix {
        let digits = &term[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return u32::from_str_radix(digits, radix).ok();
    }

    // `f64::from_str` also takes `inf` and `nan`, which are not numbers here.
    let decimal = term.chars().any(|c| c.is_ascii_digit())
        && term
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !decimal {
        return None;
    }
    let value: f64 = term.parse().ok()?;
    if !(0.0..=f64::from(u32::MAX)).contains(&value) || value.fract() > 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let no = value as u32;
    Some(no)
}

/// Resolves terms against a store.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn PokemonStore>,
}

impl Resolver {
    /// Create a resolver over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn PokemonStore>) -> Self {
        Self { store }
    }

    /// Resolve `term` to exactly one pokemon.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no reading of the term matches a record, or
    /// `Internal` if the store fails.
    pub fn resolve(&self, term: &str) -> CatalogResult<Pokemon> {
        self.resolve_with_kind(term).map(|(pokemon, _)| pokemon)
    }

    /// Like [`Resolver::resolve`], also reporting which reading matched.
    ///
    /// # Errors
    ///
    /// Same as [`Resolver::resolve`].
    pub fn resolve_with_kind(&self, term: &str) -> CatalogResult<(Pokemon, TermKind)> {
        for kind in TermKind::ORDER {
            let Some(filter) = kind.filter_for(term) else {
                continue;
            };

            let found = match filter {
                Filter::Id(id) => self.store.find_by_id(id),
                other => self.store.find_one(&other),
            }
            .map_err(|e| map_storage_error(Operation::Find, e))?;

            if let Some(pokemon) = found {
                debug!("resolved {term:?} as {kind:?} to {}", pokemon.id);
                return Ok((pokemon, kind));
            }
        }

        debug!("no pokemon matches {term:?}");
        Err(CatalogError::NotFound {
            term: term.to_string(),
        })
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}
