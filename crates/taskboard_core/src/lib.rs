//! Core record store for the collaborative task tracker.
//! Tasks and users live in memory and are persisted to JSON after every
//! mutation.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId};
pub use model::user::{User, UserId};
pub use model::vocab::{Category, TaskStatus};
pub use repo::entity_repo::{Entity, EntityRepository, RepoError, RepoResult};
pub use repo::task_repo::{NewTask, TaskPatch, TaskRepository, TASKS_COLLECTION};
pub use repo::user_repo::{NewUser, UserPatch, UserRepository, USERS_COLLECTION};
pub use repo::validation::ValidationError;
pub use service::tracker_service::{Tracker, UserWorkload};
pub use store::{CollectionStore, JsonFileStore, RawRecord, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
