//! Reseeding from the external catalog.
//!
//! This module groups the source contract, its adapters and the reseed
//! coordinator.

pub mod coordinator;
#[cfg(feature = "http-source")]
pub mod http;
pub mod source;

pub use coordinator::{ReseedReport, Reseeder, SEED_MESSAGE};
#[cfg(feature = "http-source")]
pub use http::HttpPokemonSource;
pub use source::{
    parse_reference_no, PokemonSource, SourceError, SourcePage, SourceRecord, StaticSource,
};
