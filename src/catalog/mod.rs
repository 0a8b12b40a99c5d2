//! Catalog layer: term resolution, mutations and error mapping.

mod errors;
mod resolver;
mod service;

pub use errors::{map_storage_error, Operation};
pub use resolver::{Resolver, TermKind};
pub use service::{Pagination, PokemonCatalog, DELETED_MESSAGE};
