//! Category and status vocabularies for tasks.
//!
//! # Responsibility
//! - Name the known category/status members as closed enums.
//! - Carry values outside the known set through unchanged.
//!
//! # Invariants
//! - Known members parse case-insensitively and serialize in lowercase.
//! - `Unrecognized` keeps the caller's raw text verbatim; `normalized` folds
//!   it into a known member when the text names one.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Task grouping label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Urgent,
    Other,
    /// Value passed through from the caller layer without a known member.
    Unrecognized(String),
}

impl Category {
    /// Every known member, in menu order.
    pub const KNOWN: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Urgent,
        Category::Other,
    ];

    /// Parses caller text. Returns `None` for blank input.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::from(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Shopping => "shopping",
            Self::Urgent => "urgent",
            Self::Other => "other",
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    /// Whether this value carries no usable text.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }

    /// Folds an `Unrecognized` value that spells a known member into it.
    pub fn normalized(self) -> Self {
        match self {
            Self::Unrecognized(raw) => Self::from(raw),
            known => known,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "work" => Self::Work,
            "personal" => Self::Personal,
            "shopping" => Self::Shopping,
            "urgent" => Self::Urgent,
            "other" => Self::Other,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Created but not started.
    Pending,
    /// Work is in progress.
    InProgress,
    /// Done.
    Completed,
    /// Value passed through from the caller layer without a known member.
    Unrecognized(String),
}

impl TaskStatus {
    /// Every known member, in lifecycle order.
    pub const KNOWN: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Parses caller text. Returns `None` for blank input.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::from(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    /// Whether this value carries no usable text.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }

    /// Folds an `Unrecognized` value that spells a known member into it.
    pub fn normalized(self) -> Self {
        match self {
            Self::Unrecognized(raw) => Self::from(raw),
            known => known,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "in-progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, TaskStatus};

    #[test]
    fn known_members_parse_case_insensitively() {
        assert_eq!(Category::parse(" WORK "), Some(Category::Work));
        assert_eq!(TaskStatus::parse("In-Progress"), Some(TaskStatus::InProgress));
    }

    #[test]
    fn blank_input_parses_to_none() {
        assert_eq!(Category::parse("   "), None);
        assert_eq!(TaskStatus::parse(""), None);
    }

    #[test]
    fn unknown_values_pass_through_verbatim() {
        let category = Category::parse("Errands").expect("non-blank should parse");
        assert_eq!(category, Category::Unrecognized("Errands".to_string()));
        assert_eq!(category.as_str(), "Errands");

        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json, "Errands");
    }

    #[test]
    fn status_serializes_with_hyphenated_wire_name() {
        let json = serde_json::to_value(TaskStatus::InProgress).unwrap();
        assert_eq!(json, "in-progress");
        let decoded: TaskStatus = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, TaskStatus::InProgress);
    }

    #[test]
    fn normalized_folds_known_spellings() {
        let category = Category::Unrecognized("Work".to_string()).normalized();
        assert_eq!(category, Category::Work);
        let status = TaskStatus::Unrecognized("IN-PROGRESS".to_string()).normalized();
        assert_eq!(status, TaskStatus::InProgress);

        let errands = Category::Unrecognized("Errands".to_string());
        assert_eq!(errands.clone().normalized(), errands);
    }
}
