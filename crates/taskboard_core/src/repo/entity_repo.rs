//! Generic in-memory collection synchronized with a `CollectionStore`.
//!
//! # Responsibility
//! - Hydrate typed records from raw stored records.
//! - Provide lookup, snapshot and mutation primitives that persist on write.
//!
//! # Invariants
//! - Record ids are pairwise distinct; hydration rejects duplicates.
//! - Snapshots are owned copies; callers cannot reach internal state.
//! - A failed save leaves memory ahead of disk and is reported as
//!   `RepoError::Storage`.

use super::validation::ValidationError;
use crate::model::task::{Task, TaskId};
use crate::model::user::User;
use crate::store::{CollectionStore, RawRecord, StoreError};
use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for validation, lookup and persistence failures.
#[derive(Debug)]
pub enum RepoError {
    /// Rejected before any mutation; caller may correct input and retry.
    Validation(ValidationError),
    /// Referenced id does not exist in the collection.
    NotFound { collection: String, id: String },
    /// Backing store failed; the durability guarantee was not met.
    Storage(StoreError),
    /// No identifier is left to allocate in the collection.
    IdsExhausted { collection: String },
}

impl RepoError {
    pub fn not_found(collection: &str, id: impl Display) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    /// Whether the caller should abort instead of prompting again.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::IdsExhausted { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { collection, id } => write!(f, "{collection} record not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::IdsExhausted { collection } => {
                write!(f, "no identifiers left to allocate in {collection}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Storage(err) => Some(err),
            Self::IdsExhausted { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Record type that can live in an `EntityRepository`.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    type Id: ?Sized + PartialEq + Display;

    fn id(&self) -> &Self::Id;
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> &TaskId {
        &self.id
    }
}

impl Entity for User {
    type Id = str;

    fn id(&self) -> &str {
        &self.id
    }
}

/// One collection of `T` held in memory and mirrored to `S`.
///
/// Assumes a single in-flight mutation at a time, which `&mut self` enforces
/// for one instance. Two instances must not share a backing file.
#[derive(Debug)]
pub struct EntityRepository<T: Entity, S: CollectionStore> {
    store: S,
    collection: String,
    records: Vec<T>,
}

impl<T: Entity, S: CollectionStore> EntityRepository<T, S> {
    /// Creates an empty, not yet hydrated repository.
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            records: Vec::new(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces in-memory state with the stored collection.
    ///
    /// Returns the number of records loaded. Undecodable records or
    /// duplicate ids fail with `StoreError::InvalidRecord` and leave the
    /// current state untouched.
    pub fn hydrate(&mut self) -> RepoResult<usize> {
        self.hydrate_with(|_| Ok(()))
    }

    /// Like `hydrate`, but `check` may reject the decoded collection with a
    /// reason before it replaces the in-memory state.
    pub fn hydrate_with(
        &mut self,
        check: impl FnOnce(&[T]) -> Result<(), String>,
    ) -> RepoResult<usize> {
        let raw = self.store.load(&self.collection)?;
        let mut records: Vec<T> = Vec::with_capacity(raw.len());

        for (index, value) in raw.into_iter().enumerate() {
            let record: T = serde_json::from_value(value).map_err(|err| {
                self.invalid_record(format!("record #{index} does not decode: {err}"))
            })?;
            if records.iter().any(|existing| existing.id() == record.id()) {
                return Err(self.invalid_record(format!(
                    "record #{index} repeats id {}",
                    record.id()
                )));
            }
            records.push(record);
        }

        check(&records).map_err(|message| self.invalid_record(message))?;

        self.records = records;
        Ok(self.records.len())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrowed view for read-only derivations inside the crate.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Owned copy of the collection in insertion order.
    pub fn snapshot(&self) -> Vec<T> {
        self.records.clone()
    }

    /// Owned copies of records matching `predicate`, order preserved.
    pub fn select(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        self.records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Appends an already validated record and persists.
    pub fn insert(&mut self, record: T) -> RepoResult<()> {
        self.records.push(record);
        self.persist()
    }

    /// Swaps the record at `index` for an already validated one and persists.
    ///
    /// An out-of-range `index` is reported as `NotFound` for the record's id.
    pub fn replace(&mut self, index: usize, record: T) -> RepoResult<()> {
        let Some(slot) = self.records.get_mut(index) else {
            return Err(RepoError::not_found(&self.collection, record.id()));
        };
        *slot = record;
        self.persist()
    }

    /// Removes the record with `id`. Returns `false` without writing when
    /// nothing matched.
    pub fn remove(&mut self, id: &T::Id) -> RepoResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        self.records.remove(index);
        self.persist()?;
        Ok(true)
    }

    /// Writes the full collection through the store.
    pub fn persist(&self) -> RepoResult<()> {
        let raw = self
            .records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<RawRecord>, _>>()
            .map_err(|source| StoreError::Encode {
                collection: self.collection.clone(),
                source,
            })?;

        self.store.save(&self.collection, &raw).map_err(|err| {
            error!(
                "event=collection_persist module=repo status=error collection={} records={} error={}",
                self.collection,
                raw.len(),
                err
            );
            RepoError::Storage(err)
        })
    }

    fn invalid_record(&self, message: String) -> RepoError {
        RepoError::Storage(StoreError::InvalidRecord {
            collection: self.collection.clone(),
            message,
        })
    }
}
