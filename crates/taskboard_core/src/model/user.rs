//! User record and identifier helpers.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// User identifier of the form `user<N>`.
pub type UserId = String;

const USER_ID_PREFIX: &str = "user";

/// One team member tasks can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Trimmed, never empty.
    pub name: String,
    /// Trimmed, unique across users ignoring ASCII case.
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.email)
    }
}

/// Formats the identifier for numeric suffix `n`.
pub fn format_user_id(n: u64) -> UserId {
    format!("{USER_ID_PREFIX}{n}")
}

/// Extracts the numeric suffix used for id allocation.
///
/// All ASCII digits in the id are concatenated. Returns `None` when the id
/// has no digits or the digits overflow `u64`.
pub fn user_id_suffix(id: &str) -> Option<u64> {
    let digits: String = id.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
