//! Tracker composition over the task and user repositories.
//!
//! # Responsibility
//! - Open both collections from one configuration.
//! - Offer cross-collection read helpers without enforcing references.
//!
//! # Invariants
//! - Each collection is persisted independently; there is no rollback
//!   across the two.
//! - `assigned_to` stays a weak reference: deleting a user leaves tasks as is.

use crate::config::StoreConfig;
use crate::model::task::Task;
use crate::model::user::User;
use crate::repo::entity_repo::RepoResult;
use crate::repo::task_repo::TaskRepository;
use crate::repo::user_repo::UserRepository;
use crate::store::{CollectionStore, JsonFileStore};
use log::info;

/// One user and the tasks currently pointing at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWorkload {
    pub user: User,
    /// Collection order.
    pub tasks: Vec<Task>,
}

/// Owns the task and user repositories for one application instance.
#[derive(Debug)]
pub struct Tracker<S: CollectionStore> {
    tasks: TaskRepository<S>,
    users: UserRepository<S>,
}

impl Tracker<JsonFileStore> {
    /// Creates the data directory if needed and hydrates both collections.
    pub fn open(config: &StoreConfig) -> RepoResult<Self> {
        let store = JsonFileStore::new(config.data_dir());
        store.ensure_data_dir()?;
        Self::with_store(store, config)
    }
}

impl<S: CollectionStore + Clone> Tracker<S> {
    /// Hydrates both collections through `store`, using the collection keys
    /// from `config`.
    pub fn with_store(store: S, config: &StoreConfig) -> RepoResult<Self> {
        let mut tasks = TaskRepository::with_collection(store.clone(), config.tasks_collection());
        let mut users = UserRepository::with_collection(store, config.users_collection());
        let task_count = tasks.initialize()?;
        let user_count = users.initialize()?;

        info!(
            "event=tracker_open module=service status=ok tasks={} users={}",
            task_count, user_count
        );
        Ok(Self { tasks, users })
    }
}

impl<S: CollectionStore> Tracker<S> {
    pub fn tasks(&self) -> &TaskRepository<S> {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskRepository<S> {
        &mut self.tasks
    }

    pub fn users(&self) -> &UserRepository<S> {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut UserRepository<S> {
        &mut self.users
    }

    /// Looks up `user_id` and the tasks assigned to it.
    ///
    /// Returns `None` when the user does not exist, even if tasks still
    /// reference that id.
    pub fn assigned_tasks(&self, user_id: &str) -> Option<UserWorkload> {
        let user = self.users.get_user(user_id)?;
        let tasks = self.tasks.filter_by_user(user_id);
        Some(UserWorkload { user, tasks })
    }
}
