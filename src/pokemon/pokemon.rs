//! Pokemon records and identity.
//!
//! A pokemon is identified three ways: the store-assigned [`PokemonId`],
//! the caller-supplied catalog number `no`, and its normalized `name`.
//! All three are unique across the catalog.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Store-assigned storage id.
///
/// Assigned once on insert and never changed afterwards.
///
/// # Examples
///
/// ```
/// use pokedex::PokemonId;
///
/// let id = PokemonId::new();
/// assert_eq!(PokemonId::parse(&id.to_string()), Some(id));
/// assert_eq!(PokemonId::parse("25"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PokemonId(Uuid);

impl PokemonId {
    /// Creates a new random storage id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a storage id from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parses `term` if it is syntactically a storage id.
    ///
    /// Accepts any textual UUID form (hyphenated, simple, braced, urn).
    /// Surrounding whitespace is not stripped.
    #[must_use]
    pub fn parse(term: &str) -> Option<Self> {
        Uuid::parse_str(term).ok().map(Self)
    }
}

impl Default for PokemonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PokemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PokemonId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Lowercases and trims a name.
///
/// Applied before every write and every name lookup, so stored names are
/// always in this form.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn validate_no(no: i64) -> Result<u32, ValidationError> {
    u32::try_from(no)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or(ValidationError::NonPositiveNumber { value: no })
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(normalized)
}

/// A persisted catalog record.
///
/// Equality is identity: two records are equal when their storage ids are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    /// Storage id.
    pub id: PokemonId,

    /// Catalog number (positive, unique).
    pub no: u32,

    /// Normalized name (unique).
    pub name: String,
}

impl Pokemon {
    /// Creates a record with a fresh storage id.
    ///
    /// The name is stored as given; callers normalize first.
    #[must_use]
    pub fn new(no: u32, name: impl Into<String>) -> Self {
        Self::with_id(PokemonId::new(), no, name)
    }

    /// Creates a record with a specific storage id.
    #[must_use]
    pub fn with_id(id: PokemonId, no: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            no,
            name: name.into(),
        }
    }
}

impl PartialEq for Pokemon {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Pokemon {}

impl std::hash::Hash for Pokemon {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Create input.
///
/// `no` is signed so that zero and negative numbers reach validation
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPokemon {
    /// Catalog number.
    pub no: i64,
    /// Display name, any casing.
    pub name: String,
}

impl NewPokemon {
    /// Creates a create request.
    #[must_use]
    pub fn new(no: i64, name: impl Into<String>) -> Self {
        Self {
            no,
            name: name.into(),
        }
    }

    /// Validates the request and normalizes its name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `no` is not positive or the name is
    /// blank.
    pub fn validate(&self) -> Result<(u32, String), ValidationError> {
        Ok((validate_no(self.no)?, validate_name(&self.name)?))
    }
}

/// Partial update. Absent fields are left untouched.
///
/// Like [`NewPokemon`], `no` is signed so that a negative number is reported
/// by [`PokemonPatch::normalized`] rather than by the deserializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonPatch {
    /// New catalog number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<i64>,

    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PokemonPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the catalog number.
    #[must_use]
    pub fn no(mut self, no: i64) -> Self {
        self.no = Some(no);
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.no.is_none() && self.name.is_none()
    }

    /// Validates the patch into the changes a store applies.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `no` is not positive or the name is
    /// blank.
    pub fn normalized(&self) -> Result<PokemonChanges, ValidationError> {
        let no = self.no.map(validate_no).transpose()?;
        let name = self.name.as_deref().map(validate_name).transpose()?;
        Ok(PokemonChanges { no, name })
    }
}

/// Validated field changes handed to the store.
///
/// Names are applied verbatim; build these through
/// [`PokemonPatch::normalized`] outside of storage code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PokemonChanges {
    /// New catalog number.
    pub no: Option<u32>,

    /// New name.
    pub name: Option<String>,
}

impl PokemonChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the catalog number.
    #[must_use]
    pub fn no(mut self, no: u32) -> Self {
        self.no = Some(no);
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if nothing changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.no.is_none() && self.name.is_none()
    }

    /// Overlays the changes on `snapshot`; changed fields win.
    #[must_use]
    pub fn apply_to(&self, snapshot: &Pokemon) -> Pokemon {
        Pokemon {
            id: snapshot.id,
            no: self.no.unwrap_or(snapshot.no),
            name: self.name.clone().unwrap_or_else(|| snapshot.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pokemon_id_parse() {
        let id = PokemonId::new();
        assert_eq!(PokemonId::parse(&id.to_string()), Some(id));
        assert_eq!(PokemonId::parse(&format!("  {id} ")), None);
        assert_eq!(PokemonId::parse("25"), None);
        assert_eq!(PokemonId::parse("pikachu"), None);
        assert_eq!(PokemonId::parse(""), None);
    }

    #[test]
    fn test_pokemon_id_display_is_uuid() {
        let id = PokemonId::new();
        let display = id.to_string();
        assert_eq!(display.len(), 36);
        assert!(display.contains('-'));
        assert!(display.parse::<u64>().is_err());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  BulbaSaur \n"), "bulbasaur");
        assert_eq!(normalize_name("Mr. Mime"), "mr. mime");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_new_pokemon_validate() {
        assert_eq!(
            NewPokemon::new(1, " Bulbasaur ").validate().unwrap(),
            (1, "bulbasaur".to_string())
        );
        assert_eq!(
            NewPokemon::new(0, "x").validate(),
            Err(ValidationError::NonPositiveNumber { value: 0 })
        );
        assert_eq!(
            NewPokemon::new(-4, "x").validate(),
            Err(ValidationError::NonPositiveNumber { value: -4 })
        );
        assert_eq!(
            NewPokemon::new(1, "  ").validate(),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn test_new_pokemon_rejects_out_of_range_number() {
        let too_big = i64::from(u32::MAX) + 1;
        assert!(NewPokemon::new(too_big, "x").validate().is_err());
    }

    #[test]
    fn test_patch_normalized() {
        let changes = PokemonPatch::new().name("  IVYSAUR").normalized().unwrap();
        assert_eq!(changes.name.as_deref(), Some("ivysaur"));
        assert_eq!(changes.no, None);

        assert_eq!(
            PokemonPatch::new().no(25).normalized(),
            Ok(PokemonChanges::new().no(25))
        );
        assert_eq!(
            PokemonPatch::new().no(0).normalized(),
            Err(ValidationError::NonPositiveNumber { value: 0 })
        );
        assert_eq!(
            PokemonPatch::new().name("").normalized(),
            Err(ValidationError::EmptyName)
        );
        assert!(PokemonPatch::new().normalized().unwrap().is_empty());
    }

    #[test]
    fn test_patch_negative_number_reaches_validation() {
        let patch: PokemonPatch = serde_json::from_str(r#"{"no":-1}"#).unwrap();
        assert_eq!(patch.no, Some(-1));
        assert_eq!(
            patch.normalized(),
            Err(ValidationError::NonPositiveNumber { value: -1 })
        );

        let too_big = i64::from(u32::MAX) + 1;
        assert_eq!(
            PokemonPatch::new().no(too_big).normalized(),
            Err(ValidationError::NonPositiveNumber { value: too_big })
        );
    }

    #[test]
    fn test_changes_apply_to_overlays_fields() {
        let snapshot = Pokemon::new(1, "bulbasaur");
        let merged = PokemonChanges::new().name("ivysaur").apply_to(&snapshot);
        assert_eq!(merged.id, snapshot.id);
        assert_eq!(merged.no, 1);
        assert_eq!(merged.name, "ivysaur");

        let merged = PokemonChanges::new().no(2).apply_to(&snapshot);
        assert_eq!(merged.no, 2);
        assert_eq!(merged.name, "bulbasaur");
    }

    #[test]
    fn test_pokemon_equality_is_identity() {
        let id = PokemonId::new();
        let a = Pokemon::with_id(id, 1, "bulbasaur");
        let b = Pokemon::with_id(id, 2, "ivysaur");
        assert_eq!(a, b);
        assert_ne!(a, Pokemon::new(1, "bulbasaur"));
    }

    #[test]
    fn test_patch_deserialize_partial() {
        let patch: PokemonPatch = serde_json::from_str(r#"{"name":"Pikachu"}"#).unwrap();
        assert_eq!(patch.no, None);
        assert_eq!(patch.name.as_deref(), Some("Pikachu"));

        let json = serde_json::to_string(&PokemonPatch::new().no(25)).unwrap();
        assert_eq!(json, r#"{"no":25}"#);
    }
}
