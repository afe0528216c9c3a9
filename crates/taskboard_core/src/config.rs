//! Store configuration.
//!
//! # Responsibility
//! - Resolve where collection files live and which collection keys to use.
//!
//! # Invariants
//! - `data_dir` is never empty.
//! - Collection keys are valid file stems and distinct from each other.

use crate::repo::task_repo::TASKS_COLLECTION;
use crate::repo::user_repo::USERS_COLLECTION;
use crate::store::validate_collection_name;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TASKBOARD_DATA_DIR";

/// Data directory used when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Location and naming of the persisted collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_dir: PathBuf,
    tasks_collection: String,
    users_collection: String,
}

impl StoreConfig {
    /// Builds a config rooted at `data_dir` with default collection keys.
    ///
    /// # Errors
    /// - Returns an error when `data_dir` is empty after trimming.
    pub fn new(data_dir: &str) -> Result<Self, String> {
        Ok(Self {
            data_dir: normalize_data_dir(data_dir)?,
            tasks_collection: TASKS_COLLECTION.to_string(),
            users_collection: USERS_COLLECTION.to_string(),
        })
    }

    /// Reads `TASKBOARD_DATA_DIR`, falling back to `./data`.
    pub fn from_env() -> Result<Self, String> {
        match std::env::var(DATA_DIR_ENV) {
            Ok(value) => Self::new(&value),
            Err(_) => Self::new(DEFAULT_DATA_DIR),
        }
    }

    /// Overrides the collection keys.
    ///
    /// # Errors
    /// - Returns an error when either key is not a plain file stem.
    /// - Returns an error when both keys are equal.
    pub fn with_collections(mut self, tasks: &str, users: &str) -> Result<Self, String> {
        for name in [tasks, users] {
            validate_collection_name(name).map_err(|err| err.to_string())?;
        }
        if tasks == users {
            return Err(format!(
                "task and user collections must differ, both are `{tasks}`"
            ));
        }
        self.tasks_collection = tasks.to_string();
        self.users_collection = users.to_string();
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tasks_collection(&self) -> &str {
        &self.tasks_collection
    }

    pub fn users_collection(&self) -> &str {
        &self.users_collection
    }
}

fn normalize_data_dir(data_dir: &str) -> Result<PathBuf, String> {
    let trimmed = data_dir.trim();
    if trimmed.is_empty() {
        return Err("data_dir cannot be empty".to_string());
    }
    Ok(PathBuf::from(trimmed))
}
