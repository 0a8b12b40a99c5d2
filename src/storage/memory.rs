//! In-memory storage backend.
//!
//! This module provides a thread-safe in-memory implementation of
//! [`PokemonStore`]. It is intended for embedded usage, tests, and as a
//! reference implementation of the unique-index semantics.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use crate::pokemon::{Pokemon, PokemonChanges, PokemonId};
use crate::storage::traits::{
    DeleteOutcome, Filter, PokemonStore, StorageError, UniqueKey, UpdateOutcome,
};

#[derive(Debug, Default)]
struct PokemonState {
    by_id: HashMap<PokemonId, Pokemon>,
    by_no: BTreeMap<u32, PokemonId>,
    by_name: HashMap<String, PokemonId>,
}

impl PokemonState {
    /// Ids matching `filter`, ascending by `no`.
    fn select(&self, filter: &Filter) -> Vec<PokemonId> {
        match filter {
            Filter::All => self.by_no.values().copied().collect(),
            Filter::Id(id) => self.by_id.get(id).map(|p| p.id).into_iter().collect(),
            Filter::No(no) => self.by_no.get(no).copied().into_iter().collect(),
            Filter::Name(name) => self.by_name.get(name).copied().into_iter().collect(),
        }
    }

    /// Index keys of `(no, name)` already held by a record other than `exclude`.
    fn collisions(&self, no: u32, name: &str, exclude: Option<PokemonId>) -> Vec<UniqueKey> {
        let taken = |owner: Option<&PokemonId>| owner.is_some_and(|id| Some(*id) != exclude);

        let mut keys = Vec::new();
        if taken(self.by_no.get(&no)) {
            keys.push(UniqueKey::No(no));
        }
        if taken(self.by_name.get(name)) {
            keys.push(UniqueKey::Name(name.to_string()));
        }
        keys
    }

    fn index(&mut self, pokemon: Pokemon) {
        self.by_no.insert(pokemon.no, pokemon.id);
        self.by_name.insert(pokemon.name.clone(), pokemon.id);
        self.by_id.insert(pokemon.id, pokemon);
    }

    fn unindex(&mut self, id: PokemonId) -> Option<Pokemon> {
        let prev = self.by_id.remove(&id)?;
        self.by_no.remove(&prev.no);
        self.by_name.remove(&prev.name);
        Some(prev)
    }

    fn ensure_new_id(&self, id: PokemonId) -> Result<(), StorageError> {
        if self.by_id.contains_key(&id) {
            return Err(StorageError::BackendError(format!(
                "storage id already assigned: {id}"
            )));
        }
        Ok(())
    }
}

/// Thread-safe in-memory pokemon store.
#[derive(Debug, Default)]
pub struct InMemoryPokemonStore {
    state: RwLock<PokemonState>,
}

impl InMemoryPokemonStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PokemonStore for InMemoryPokemonStore {
    fn insert_one(&self, pokemon: Pokemon) -> Result<Pokemon, StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::LockPoisoned("pokemon.insert_one"))?;
        state.ensure_new_id(pokemon.id)?;

        let keys = state.collisions(pokemon.no, &pokemon.name, None);
        if !keys.is_empty() {
            return Err(StorageError::DuplicateKey(keys));
        }

        state.index(pokemon.clone());
        Ok(pokemon)
    }

    fn insert_many(&self, batch: Vec<Pokemon>) -> Result<usize, StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::LockPoisoned("pokemon.insert_many"))?;

        // Validate the whole batch before touching the indexes.
        let mut ids = HashSet::with_capacity(batch.len());
        let mut nos = HashSet::with_capacity(batch.len());
        let mut names = HashSet::with_capacity(batch.len());
        for pokemon in &batch {
            state.ensure_new_id(pokemon.id)?;
            if !ids.insert(pokemon.id) {
                return Err(StorageError::BackendError(format!(
                    "storage id repeated in batch: {}",
                    pokemon.id
                )));
            }

            let mut keys = state.collisions(pokemon.no, &pokemon.name, None);
            if !nos.insert(pokemon.no) && !keys.contains(&UniqueKey::No(pokemon.no)) {
                keys.push(UniqueKey::No(pokemon.no));
            }
            if !names.insert(pokemon.name.as_str()) {
                let key = UniqueKey::Name(pokemon.name.clone());
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            if !keys.is_empty() {
                return Err(StorageError::DuplicateKey(keys));
            }
        }

        let inserted = batch.len();
        for pokemon in batch {
            state.index(pokemon);
        }
        Ok(inserted)
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<Pokemon>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned("pokemon.find_one"))?;
        Ok(state
            .select(filter)
            .first()
            .and_then(|id| state.by_id.get(id).cloned()))
    }

    fn find_by_id(&self, id: PokemonId) -> Result<Option<Pokemon>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned("pokemon.find_by_id"))?;
        Ok(state.by_id.get(&id).cloned())
    }

    fn find(
        &self,
        filter: &Filter,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Pokemon>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned("pokemon.find"))?;
        Ok(state
            .select(filter)
            .iter()
            .skip(skip)
            .take(limit)
            .filter_map(|id| state.by_id.get(id).cloned())
            .collect())
    }

    fn update_one(
        &self,
        filter: &Filter,
        changes: &PokemonChanges,
    ) -> Result<UpdateOutcome, StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::LockPoisoned("pokemon.update_one"))?;
        let Some(id) = state.select(filter).first().copied() else {
            return Ok(UpdateOutcome::default());
        };
        let prev = state.by_id.get(&id).cloned().ok_or_else(|| {
            StorageError::BackendError(format!("index points at missing record: {id}"))
        })?;

        let next = changes.apply_to(&prev);
        let keys = state.collisions(next.no, &next.name, Some(id));
        if !keys.is_empty() {
            return Err(StorageError::DuplicateKey(keys));
        }

        let modified = next.no != prev.no || next.name != prev.name;
        if modified {
            state.unindex(id);
            state.index(next);
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    fn delete_one(&self, filter: &Filter) -> Result<DeleteOutcome, StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::LockPoisoned("pokemon.delete_one"))?;
        let deleted = state
            .select(filter)
            .first()
            .copied()
            .and_then(|id| state.unindex(id));
        Ok(DeleteOutcome {
            deleted_count: u64::from(deleted.is_some()),
        })
    }

    fn delete_many(&self, filter: &Filter) -> Result<DeleteOutcome, StorageError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::LockPoisoned("pokemon.delete_many"))?;
        let mut deleted_count = 0u64;
        for id in state.select(filter) {
            if state.unindex(id).is_some() {
                deleted_count += 1;
            }
        }
        Ok(DeleteOutcome { deleted_count })
    }

    fn count(&self, filter: &Filter) -> Result<usize, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::LockPoisoned("pokemon.count"))?;
        Ok(state.select(filter).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (InMemoryPokemonStore, Pokemon, Pokemon) {
        let store = InMemoryPokemonStore::new();
        let bulbasaur = store.insert_one(Pokemon::new(1, "bulbasaur")).unwrap();
        let pikachu = store.insert_one(Pokemon::new(25, "pikachu")).unwrap();
        (store, bulbasaur, pikachu)
    }

    #[test]
    fn insert_get_and_indexes() {
        let (store, bulbasaur, pikachu) = seeded();

        assert_eq!(store.find_by_id(bulbasaur.id).unwrap(), Some(bulbasaur.clone()));
        let by_no = store.find_one(&Filter::No(25)).unwrap().unwrap();
        assert_eq!(by_no.id, pikachu.id);
        let by_name = store
            .find_one(&Filter::Name("bulbasaur".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, bulbasaur.id);

        // The store compares names verbatim.
        assert!(store
            .find_one(&Filter::Name("Bulbasaur".to_string()))
            .unwrap()
            .is_none());
        assert_eq!(store.count(&Filter::All).unwrap(), 2);
    }

    #[test]
    fn insert_one_reports_every_colliding_field() {
        let (store, _, _) = seeded();

        let err = store.insert_one(Pokemon::new(1, "ivysaur")).unwrap_err();
        assert!(matches!(&err, StorageError::DuplicateKey(keys) if keys == &[UniqueKey::No(1)]));

        let err = store.insert_one(Pokemon::new(25, "bulbasaur")).unwrap_err();
        let StorageError::DuplicateKey(keys) = err else {
            panic!("expected duplicate key");
        };
        assert_eq!(
            keys,
            vec![UniqueKey::No(25), UniqueKey::Name("bulbasaur".to_string())]
        );

        assert_eq!(store.count(&Filter::All).unwrap(), 2);
    }

    #[test]
    fn insert_one_rejects_reused_storage_id() {
        let (store, bulbasaur, _) = seeded();
        let err = store
            .insert_one(Pokemon::with_id(bulbasaur.id, 2, "ivysaur"))
            .unwrap_err();
        assert!(matches!(err, StorageError::BackendError(_)));
    }

    #[test]
    fn insert_many_is_all_or_nothing() {
        let (store, _, _) = seeded();

        let err = store
            .insert_many(vec![Pokemon::new(2, "ivysaur"), Pokemon::new(25, "raichu")])
            .unwrap_err();
        assert!(err.is_duplicate_key());
        assert!(store.find_one(&Filter::No(2)).unwrap().is_none());

        let err = store
            .insert_many(vec![Pokemon::new(3, "venusaur"), Pokemon::new(4, "venusaur")])
            .unwrap_err();
        let StorageError::DuplicateKey(keys) = err else {
            panic!("expected duplicate key");
        };
        assert_eq!(keys, vec![UniqueKey::Name("venusaur".to_string())]);
        assert_eq!(store.count(&Filter::All).unwrap(), 2);

        let inserted = store
            .insert_many(vec![Pokemon::new(2, "ivysaur"), Pokemon::new(3, "venusaur")])
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.count(&Filter::All).unwrap(), 4);
    }

    #[test]
    fn find_orders_by_no_and_pages() {
        let store = InMemoryPokemonStore::new();
        store
            .insert_many(vec![
                Pokemon::new(7, "squirtle"),
                Pokemon::new(1, "bulbasaur"),
                Pokemon::new(4, "charmander"),
            ])
            .unwrap();

        let names: Vec<String> = store
            .find(&Filter::All, 0, 10)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["bulbasaur", "charmander", "squirtle"]);

        let page = store.find(&Filter::All, 1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].no, 4);

        assert!(store.find(&Filter::All, 5, 10).unwrap().is_empty());
        assert_eq!(store.find_one(&Filter::All).unwrap().unwrap().no, 1);
    }

    #[test]
    fn update_one_reindexes_and_checks_uniqueness() {
        let (store, bulbasaur, _) = seeded();

        let outcome = store
            .update_one(
                &Filter::Id(bulbasaur.id),
                &PokemonChanges::new().no(2).name("ivysaur"),
            )
            .unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome {
                matched: 1,
                modified: 1
            }
        );
        assert!(store.find_one(&Filter::No(1)).unwrap().is_none());
        assert!(store
            .find_one(&Filter::Name("bulbasaur".to_string()))
            .unwrap()
            .is_none());
        let updated = store.find_by_id(bulbasaur.id).unwrap().unwrap();
        assert_eq!((updated.no, updated.name.as_str()), (2, "ivysaur"));

        let err = store
            .update_one(
                &Filter::Id(bulbasaur.id),
                &PokemonChanges::new().name("pikachu"),
            )
            .unwrap_err();
        let StorageError::DuplicateKey(keys) = err else {
            panic!("expected duplicate key");
        };
        assert_eq!(keys, vec![UniqueKey::Name("pikachu".to_string())]);
        assert_eq!(store.find_by_id(bulbasaur.id).unwrap().unwrap().name, "ivysaur");
    }

    #[test]
    fn update_one_to_own_values_is_not_a_collision() {
        let (store, bulbasaur, _) = seeded();
        let outcome = store
            .update_one(
                &Filter::Id(bulbasaur.id),
                &PokemonChanges::new().no(1).name("bulbasaur"),
            )
            .unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome {
                matched: 1,
                modified: 0
            }
        );
    }

    #[test]
    fn update_one_without_match_is_a_noop() {
        let (store, _, _) = seeded();
        let outcome = store
            .update_one(&Filter::Id(PokemonId::new()), &PokemonChanges::new().no(99))
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::default());
    }

    #[test]
    fn delete_one_and_many() {
        let (store, bulbasaur, _) = seeded();

        let outcome = store.delete_one(&Filter::Id(bulbasaur.id)).unwrap();
        assert_eq!(outcome.deleted_count, 1);
        let outcome = store.delete_one(&Filter::Id(bulbasaur.id)).unwrap();
        assert_eq!(outcome.deleted_count, 0);

        // Freed index keys can be reused.
        store.insert_one(Pokemon::new(1, "bulbasaur")).unwrap();

        let outcome = store.delete_many(&Filter::All).unwrap();
        assert_eq!(outcome.deleted_count, 2);
        assert_eq!(store.count(&Filter::All).unwrap(), 0);
        assert_eq!(store.delete_many(&Filter::All).unwrap().deleted_count, 0);
    }
}
