//! Task record.
//!
//! # Responsibility
//! - Define the persisted task shape and its one-line summary.
//!
//! # Invariants
//! - `id` is assigned by the task repository and never reused in-process.
//! - `created_at` is captured once at construction and never rewritten.
//! - `assigned_to` is a weak reference; no user existence is implied.

use crate::model::user::UserId;
use crate::model::vocab::{Category, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Numeric task identifier.
pub type TaskId = u64;

/// One tracked task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, never empty.
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub status: TaskStatus,
    /// Serialized as `null` when unassigned.
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    /// Records written without a timestamp are stamped on load.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task stamped with the current time.
    ///
    /// Optional fields start empty; callers fill them before persisting.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        category: Category,
        status: TaskStatus,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category,
            status,
            assigned_to: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this task points at `user_id`.
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_to.as_deref() == Some(user_id)
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({}) - Assigned to: {}",
            self.status.as_str().to_uppercase(),
            self.title,
            self.category,
            self.assigned_to.as_deref().unwrap_or("unassigned")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Task;
    use crate::model::vocab::{Category, TaskStatus};

    #[test]
    fn summary_uppercases_status_and_names_assignee() {
        let mut task = Task::new(1, "Report", Category::Work, TaskStatus::InProgress);
        assert_eq!(
            task.to_string(),
            "[IN-PROGRESS] Report (work) - Assigned to: unassigned"
        );

        task.assigned_to = Some("user2".to_string());
        assert_eq!(
            task.to_string(),
            "[IN-PROGRESS] Report (work) - Assigned to: user2"
        );
    }

    #[test]
    fn wire_shape_uses_camel_case_and_null_assignee() {
        let task = Task::new(7, "Milk", Category::Shopping, TaskStatus::Pending);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["category"], "shopping");
        assert_eq!(json["status"], "pending");
        assert!(json["assignedTo"].is_null());
        assert!(json["createdAt"].is_string());
        assert!(json.get("assigned_to").is_none());
    }

    #[test]
    fn missing_optional_fields_decode_with_defaults() {
        let value = serde_json::json!({
            "id": 3,
            "title": "Old record",
            "category": "work",
            "status": "completed"
        });

        let task: Task = serde_json::from_value(value).unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.assigned_to, None);
        assert_eq!(task.status, TaskStatus::Completed);
    }
}
