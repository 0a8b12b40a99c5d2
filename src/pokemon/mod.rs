//! Pokemon data model.

#[allow(clippy::module_inception)]
pub mod pokemon;

pub use pokemon::{
    normalize_name, NewPokemon, Pokemon, PokemonChanges, PokemonId, PokemonPatch,
};
