use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Candidate, EntityId, Job, User};
use super::entity::Moderated;
use super::seed;

/// Storage abstraction so the service can be exercised against any collection.
///
/// Every read-modify-write happens inside one call so concurrent callers never
/// overwrite each other with stale copies.
pub trait EntityStore<E: Moderated>: Send + Sync {
    fn insert(&self, entity: E) -> Result<E, StoreError>;
    /// Allocates the next free id and stores the record built from it atomically.
    fn insert_with(&self, build: impl FnOnce(E::Id) -> E) -> Result<E, StoreError>;
    /// Runs `apply` on the stored record in place; `NotFound` when it is absent.
    fn modify<R>(&self, id: E::Id, apply: impl FnOnce(&mut E) -> R) -> Result<R, StoreError>;
    fn fetch(&self, id: E::Id) -> Result<Option<E>, StoreError>;
    /// Removes the record when `allow` accepts it; `Ok(None)` when refused.
    fn remove_if(&self, id: E::Id, allow: impl FnOnce(&E) -> bool) -> Result<Option<E>, StoreError>;
    fn list(&self) -> Result<Vec<E>, StoreError>;
}

/// Every collection the board works with.
pub trait BoardStore: EntityStore<User> + EntityStore<Job> + EntityStore<Candidate> {}

impl<T> BoardStore for T where T: EntityStore<User> + EntityStore<Job> + EntityStore<Candidate> {}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Insertion-ordered collection living for the lifetime of the process.
#[derive(Debug)]
pub struct MemoryStore<E> {
    records: Arc<Mutex<Vec<E>>>,
}

impl<E> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl<E> MemoryStore<E> {
    pub fn with_records(records: Vec<E>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<E>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl<E: Moderated> EntityStore<E> for MemoryStore<E> {
    fn insert(&self, entity: E) -> Result<E, StoreError> {
        let mut guard = self.lock()?;
        if guard.iter().any(|existing| existing.id() == entity.id()) {
            return Err(StoreError::Conflict);
        }
        guard.push(entity.clone());
        Ok(entity)
    }

    fn insert_with(&self, build: impl FnOnce(E::Id) -> E) -> Result<E, StoreError> {
        let mut guard = self.lock()?;
        let highest = guard.iter().map(|entity| entity.id().raw()).max().unwrap_or(0);
        let entity = build(E::Id::from_raw(highest + 1));
        if guard.iter().any(|existing| existing.id() == entity.id()) {
            return Err(StoreError::Conflict);
        }
        guard.push(entity.clone());
        Ok(entity)
    }

    fn modify<R>(&self, id: E::Id, apply: impl FnOnce(&mut E) -> R) -> Result<R, StoreError> {
        let mut guard = self.lock()?;
        let entity = guard
            .iter_mut()
            .find(|entity| entity.id() == id)
            .ok_or(StoreError::NotFound)?;
        Ok(apply(entity))
    }

    fn fetch(&self, id: E::Id) -> Result<Option<E>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.iter().find(|entity| entity.id() == id).cloned())
    }

    fn remove_if(&self, id: E::Id, allow: impl FnOnce(&E) -> bool) -> Result<Option<E>, StoreError> {
        let mut guard = self.lock()?;
        let index = guard
            .iter()
            .position(|entity| entity.id() == id)
            .ok_or(StoreError::NotFound)?;
        if !allow(&guard[index]) {
            return Ok(None);
        }
        Ok(Some(guard.remove(index)))
    }

    fn list(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.lock()?.clone())
    }
}

/// The three board collections, seeded with the demo records on construction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoard {
    users: MemoryStore<User>,
    jobs: MemoryStore<Job>,
    candidates: MemoryStore<Candidate>,
}

impl InMemoryBoard {
    pub fn new(users: Vec<User>, jobs: Vec<Job>, candidates: Vec<Candidate>) -> Self {
        Self {
            users: MemoryStore::with_records(users),
            jobs: MemoryStore::with_records(jobs),
            candidates: MemoryStore::with_records(candidates),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed::users(), seed::jobs(), seed::candidates())
    }
}

macro_rules! delegate_store {
    ($entity:ty, $field:ident) => {
        impl EntityStore<$entity> for InMemoryBoard {
            fn insert(&self, entity: $entity) -> Result<$entity, StoreError> {
                self.$field.insert(entity)
            }

            fn insert_with(
                &self,
                build: impl FnOnce(<$entity as Moderated>::Id) -> $entity,
            ) -> Result<$entity, StoreError> {
                self.$field.insert_with(build)
            }

            fn modify<R>(
                &self,
                id: <$entity as Moderated>::Id,
                apply: impl FnOnce(&mut $entity) -> R,
            ) -> Result<R, StoreError> {
                self.$field.modify(id, apply)
            }

            fn fetch(
                &self,
                id: <$entity as Moderated>::Id,
            ) -> Result<Option<$entity>, StoreError> {
                self.$field.fetch(id)
            }

            fn remove_if(
                &self,
                id: <$entity as Moderated>::Id,
                allow: impl FnOnce(&$entity) -> bool,
            ) -> Result<Option<$entity>, StoreError> {
                self.$field.remove_if(id, allow)
            }

            fn list(&self) -> Result<Vec<$entity>, StoreError> {
                self.$field.list()
            }
        }
    };
}

delegate_store!(User, users);
delegate_store!(Job, jobs);
delegate_store!(Candidate, candidates);
