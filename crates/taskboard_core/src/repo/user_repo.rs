//! User repository: validated CRUD over the user collection.
//!
//! # Responsibility
//! - Allocate `user<N>` ids and enforce name/email constraints.
//!
//! # Invariants
//! - Emails are unique across users ignoring case, checked before id
//!   allocation so a rejected add consumes nothing.
//! - A new id suffix is one past the largest numeric suffix present.
//! - Deleting a user never touches tasks that reference it.

use super::entity_repo::{EntityRepository, RepoError, RepoResult};
use super::validation::{eq_ignore_case, is_valid_email, required_text, ValidationError};
use crate::model::user::{format_user_id, user_id_suffix, User, UserId};
use crate::store::CollectionStore;
use log::info;

/// Collection key used for users unless configured otherwise.
pub const USERS_COLLECTION: &str = "users";

/// Input for `UserRepository::add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Partial update for one user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// User collection with id allocation and validation.
#[derive(Debug)]
pub struct UserRepository<S: CollectionStore> {
    entities: EntityRepository<User, S>,
}

impl<S: CollectionStore> UserRepository<S> {
    /// Creates an empty repository over the default `users` collection.
    ///
    /// Call `initialize` before use, or use `open`.
    pub fn new(store: S) -> Self {
        Self::with_collection(store, USERS_COLLECTION)
    }

    pub fn with_collection(store: S, collection: impl Into<String>) -> Self {
        Self {
            entities: EntityRepository::new(store, collection),
        }
    }

    /// Creates and hydrates a repository over the default collection.
    pub fn open(store: S) -> RepoResult<Self> {
        let mut repo = Self::new(store);
        repo.initialize()?;
        Ok(repo)
    }

    /// Loads the stored collection.
    ///
    /// Two stored users sharing an email, ignoring case, fail with
    /// `StoreError::InvalidRecord` and load nothing.
    pub fn initialize(&mut self) -> RepoResult<usize> {
        let loaded = self.entities.hydrate_with(|users| {
            for (index, user) in users.iter().enumerate() {
                if let Some(earlier) = users[..index]
                    .iter()
                    .find(|earlier| eq_ignore_case(&earlier.email, &user.email))
                {
                    return Err(format!(
                        "record #{index} repeats email {} of {}",
                        user.email, earlier.id
                    ));
                }
            }
            Ok(())
        })?;
        info!(
            "event=repo_init module=repo status=ok collection={} records={} next_id={}",
            self.entities.collection(),
            loaded,
            self.next_user_id()
        );
        Ok(loaded)
    }

    pub fn collection(&self) -> &str {
        self.entities.collection()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Validates, assigns the next `user<N>` id, appends and persists.
    pub fn add(&mut self, new: NewUser) -> RepoResult<User> {
        let name = required_text(&new.name, ValidationError::EmptyName)?;
        let email = self.checked_email(&new.email, None)?;

        let user = User::new(self.next_user_id(), name, email);
        self.entities.insert(user.clone())?;
        info!(
            "event=user_add module=repo status=ok user_id={} collection={}",
            user.id,
            self.entities.collection()
        );
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.entities.get(id).cloned()
    }

    /// Owned copy of every user in insertion order.
    pub fn get_all(&self) -> Vec<User> {
        self.entities.snapshot()
    }

    /// Looks a user up by email, ignoring case and surrounding whitespace.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.entities
            .records()
            .iter()
            .find(|user| eq_ignore_case(&user.email, email))
            .cloned()
    }

    /// Applies the supplied fields of `patch` to user `id` and persists.
    pub fn update(&mut self, id: &str, patch: UserPatch) -> RepoResult<User> {
        let index = self
            .entities
            .position(id)
            .ok_or_else(|| RepoError::not_found(self.entities.collection(), id))?;

        let name = patch
            .name
            .as_deref()
            .map(|name| required_text(name, ValidationError::EmptyName))
            .transpose()?;
        let email = patch
            .email
            .as_deref()
            .map(|email| self.checked_email(email, Some(id)))
            .transpose()?;

        let mut user = self.entities.records()[index].clone();
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }

        self.entities.replace(index, user.clone())?;
        info!(
            "event=user_update module=repo status=ok user_id={} collection={}",
            id,
            self.entities.collection()
        );
        Ok(user)
    }

    /// Removes user `id`. Returns `false` when no such user exists.
    pub fn delete(&mut self, id: &str) -> RepoResult<bool> {
        let removed = self.entities.remove(id)?;
        if removed {
            info!(
                "event=user_delete module=repo status=ok user_id={} collection={}",
                id,
                self.entities.collection()
            );
        }
        Ok(removed)
    }

    /// Identifier the next successful `add` will use.
    pub fn next_user_id(&self) -> UserId {
        let max_suffix = self
            .entities
            .records()
            .iter()
            .filter_map(|user| user_id_suffix(&user.id))
            .max()
            .unwrap_or(0);
        format_user_id(max_suffix.saturating_add(1))
    }

    /// Trims and checks format and uniqueness, ignoring user `owner`.
    fn checked_email(&self, raw: &str, owner: Option<&str>) -> Result<String, ValidationError> {
        let email = required_text(raw, ValidationError::EmptyEmail)?;
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }
        let taken = self
            .entities
            .records()
            .iter()
            .any(|user| Some(user.id.as_str()) != owner && eq_ignore_case(&user.email, &email));
        if taken {
            return Err(ValidationError::DuplicateEmail(email));
        }
        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::{UserPatch, UserRepository};
    use crate::model::user::User;
    use crate::repo::entity_repo::RepoError;
    use crate::repo::validation::ValidationError;
    use crate::store::{CollectionStore, RawRecord, StoreResult};

    #[derive(Debug, Default)]
    struct MemoryStore;

    impl CollectionStore for MemoryStore {
        fn load(&self, _collection: &str) -> StoreResult<Vec<RawRecord>> {
            Ok(Vec::new())
        }

        fn save(&self, _collection: &str, _records: &[RawRecord]) -> StoreResult<()> {
            Ok(())
        }
    }

    fn email_patch(email: &str) -> UserPatch {
        UserPatch {
            email: Some(email.to_string()),
            ..UserPatch::default()
        }
    }

    #[test]
    fn shared_email_is_rejected_for_either_holder() {
        let mut repo = UserRepository::new(MemoryStore);
        repo.entities
            .insert(User::new("user1", "A", "a@x.com"))
            .unwrap();
        repo.entities
            .insert(User::new("user3", "C", "A@x.com"))
            .unwrap();

        for id in ["user1", "user3"] {
            let err = repo.update(id, email_patch("a@x.com")).unwrap_err();
            assert!(matches!(
                err,
                RepoError::Validation(ValidationError::DuplicateEmail(_))
            ));
        }
    }
}
