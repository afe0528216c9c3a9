//! Task repository: validated CRUD and queries over the task collection.
//!
//! # Responsibility
//! - Allocate task ids and validate task fields before mutation.
//! - Provide read-only filters and keyword search.
//!
//! # Invariants
//! - Allocated ids strictly increase for the repository lifetime, even
//!   across deletions and reloads.
//! - `title` is stored trimmed and non-empty; `category`/`status` are
//!   checked for presence only, and known members are stored canonically.
//! - Ids stop at the last value that still has a successor.
//! - Updates validate every supplied field before applying any of them.

use super::entity_repo::{EntityRepository, RepoError, RepoResult};
use super::validation::{eq_ignore_case, required_text, ValidationError};
use crate::model::task::{Task, TaskId};
use crate::model::user::UserId;
use crate::model::vocab::{Category, TaskStatus};
use crate::store::CollectionStore;
use log::info;

/// Collection key used for tasks unless configured otherwise.
pub const TASKS_COLLECTION: &str = "tasks";

const FIRST_TASK_ID: TaskId = 1;

/// Input for `TaskRepository::add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    /// Defaults to an empty description.
    pub description: Option<String>,
    pub category: Option<Category>,
    pub status: Option<TaskStatus>,
    /// Blank ids are stored as unassigned.
    pub assigned_to: Option<UserId>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, category: Category, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            category: Some(category),
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn assigned_to(mut self, user_id: impl Into<UserId>) -> Self {
        self.assigned_to = Some(user_id.into());
        self
    }
}

/// Partial update for one task. `None` leaves a field untouched.
///
/// `assigned_to: Some(None)` clears the assignee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Option<UserId>>,
}

impl TaskPatch {
    /// Whether no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.assigned_to.is_none()
    }
}

/// Task collection with id allocation and validation.
#[derive(Debug)]
pub struct TaskRepository<S: CollectionStore> {
    entities: EntityRepository<Task, S>,
    next_id: TaskId,
}

impl<S: CollectionStore> TaskRepository<S> {
    /// Creates an empty repository over the default `tasks` collection.
    ///
    /// Call `initialize` before use, or use `open`.
    pub fn new(store: S) -> Self {
        Self::with_collection(store, TASKS_COLLECTION)
    }

    pub fn with_collection(store: S, collection: impl Into<String>) -> Self {
        Self {
            entities: EntityRepository::new(store, collection),
            next_id: FIRST_TASK_ID,
        }
    }

    /// Creates and hydrates a repository over the default collection.
    pub fn open(store: S) -> RepoResult<Self> {
        let mut repo = Self::new(store);
        repo.initialize()?;
        Ok(repo)
    }

    /// Loads the stored collection and derives the next id.
    ///
    /// The id counter never moves backwards, so reloading cannot hand out an
    /// id that was already issued by this instance. A stored id with no
    /// successor fails with `StoreError::InvalidRecord` and loads nothing.
    pub fn initialize(&mut self) -> RepoResult<usize> {
        let loaded = self.entities.hydrate_with(|tasks| {
            match tasks.iter().map(|task| task.id).max() {
                Some(max_id) if max_id.checked_add(1).is_none() => {
                    Err(format!("task id {max_id} cannot be incremented"))
                }
                _ => Ok(()),
            }
        })?;
        let stored_next = self
            .entities
            .records()
            .iter()
            .map(|task| task.id + 1)
            .max()
            .unwrap_or(FIRST_TASK_ID);
        self.next_id = self.next_id.max(stored_next);

        info!(
            "event=repo_init module=repo status=ok collection={} records={} next_id={}",
            self.entities.collection(),
            loaded,
            self.next_id
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

    /// Validates, assigns the next id, appends and persists.
    pub fn add(&mut self, new: NewTask) -> RepoResult<Task> {
        let title = required_text(&new.title, ValidationError::EmptyTitle)?;
        let category = present_category(new.category)?;
        let status = present_status(new.status)?;

        let following = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| RepoError::IdsExhausted {
                collection: self.entities.collection().to_string(),
            })?;
        let id = self.next_id;
        self.next_id = following;

        let mut task = Task::new(id, title, category, status);
        task.description = new.description.unwrap_or_default();
        task.assigned_to = normalize_assignee(new.assigned_to);

        self.entities.insert(task.clone())?;
        info!(
            "event=task_add module=repo status=ok task_id={} collection={}",
            id,
            self.entities.collection()
        );
        Ok(task)
    }

    pub fn get_by_id(&self, id: TaskId) -> Option<Task> {
        self.entities.get(&id).cloned()
    }

    /// Owned copy of every task in insertion order.
    pub fn get_all(&self) -> Vec<Task> {
        self.entities.snapshot()
    }

    /// Applies the supplied fields of `patch` to task `id` and persists.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> RepoResult<Task> {
        let index = self
            .entities
            .position(&id)
            .ok_or_else(|| RepoError::not_found(self.entities.collection(), id))?;

        let title = patch
            .title
            .as_deref()
            .map(|title| required_text(title, ValidationError::EmptyTitle))
            .transpose()?;
        let category = patch.category.map(|c| present_category(Some(c))).transpose()?;
        let status = patch.status.map(|s| present_status(Some(s))).transpose()?;

        let mut task = self.entities.records()[index].clone();
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(category) = category {
            task.category = category;
        }
        if let Some(status) = status {
            task.status = status;
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = normalize_assignee(assigned_to);
        }

        self.entities.replace(index, task.clone())?;
        info!(
            "event=task_update module=repo status=ok task_id={} collection={}",
            id,
            self.entities.collection()
        );
        Ok(task)
    }

    /// Marks task `id` as completed.
    pub fn complete(&mut self, id: TaskId) -> RepoResult<Task> {
        self.update(
            id,
            TaskPatch {
                status: Some(TaskStatus::Completed),
                ..TaskPatch::default()
            },
        )
    }

    /// Removes task `id`. Returns `false` when no such task exists.
    pub fn delete(&mut self, id: TaskId) -> RepoResult<bool> {
        let removed = self.entities.remove(&id)?;
        if removed {
            info!(
                "event=task_delete module=repo status=ok task_id={} collection={}",
                id,
                self.entities.collection()
            );
        }
        Ok(removed)
    }

    pub fn filter_by_category(&self, category: &str) -> Vec<Task> {
        self.entities
            .select(|task| eq_ignore_case(task.category.as_str(), category))
    }

    pub fn filter_by_status(&self, status: &str) -> Vec<Task> {
        self.entities
            .select(|task| eq_ignore_case(task.status.as_str(), status))
    }

    /// Tasks whose `assigned_to` equals `user_id` exactly.
    pub fn filter_by_user(&self, user_id: &str) -> Vec<Task> {
        self.entities.select(|task| task.is_assigned_to(user_id))
    }

    /// Case-insensitive substring search over title and description.
    pub fn search_by_keyword(&self, keyword: &str) -> Vec<Task> {
        let needle = keyword.to_lowercase();
        self.entities.select(|task| {
            task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle)
        })
    }
}

fn present_category(category: Option<Category>) -> Result<Category, ValidationError> {
    category
        .filter(|category| !category.is_blank())
        .map(Category::normalized)
        .ok_or(ValidationError::MissingCategory)
}

fn present_status(status: Option<TaskStatus>) -> Result<TaskStatus, ValidationError> {
    status
        .filter(|status| !status.is_blank())
        .map(TaskStatus::normalized)
        .ok_or(ValidationError::MissingStatus)
}

fn normalize_assignee(assigned_to: Option<UserId>) -> Option<UserId> {
    assigned_to.filter(|user_id| !user_id.trim().is_empty())
}
