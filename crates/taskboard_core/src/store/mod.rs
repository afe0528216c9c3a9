//! Collection persistence contracts and the JSON file backend.
//!
//! # Responsibility
//! - Define how a named collection of raw records is loaded and saved.
//! - Report filesystem failures with path context.
//!
//! # Invariants
//! - A missing or malformed backing file loads as an empty collection.
//! - Saves are all-or-nothing on disk: readers see the old file or the new one.
//! - Failures that break the durability guarantee surface as `StoreError`.

use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod json_file;

pub use json_file::JsonFileStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Raw record shape exchanged with repositories.
pub type RawRecord = Value;

/// Persistence-layer error.
#[derive(Debug)]
pub enum StoreError {
    /// Collection key cannot be used as a file name.
    InvalidCollection(String),
    /// Data directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },
    /// Read or write on a collection file failed.
    Io { path: PathBuf, source: io::Error },
    /// Collection could not be encoded as JSON.
    Encode {
        collection: String,
        source: serde_json::Error,
    },
    /// Temporary file could not be moved over the target.
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// A persisted record does not decode into its typed shape.
    InvalidRecord { collection: String, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCollection(name) => write!(f, "invalid collection name `{name}`"),
            Self::CreateDir { path, source } => write!(
                f,
                "failed to create data directory `{}`: {source}",
                path.display()
            ),
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Encode { collection, source } => {
                write!(f, "failed to encode collection `{collection}`: {source}")
            }
            Self::Rename { from, to, source } => write!(
                f,
                "failed to move `{}` into place at `{}`: {source}",
                from.display(),
                to.display()
            ),
            Self::InvalidRecord {
                collection,
                message,
            } => write!(f, "invalid persisted record in `{collection}`: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCollection(_) => None,
            Self::CreateDir { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Encode { source, .. } => Some(source),
            Self::Rename { source, .. } => Some(source),
            Self::InvalidRecord { .. } => None,
        }
    }
}

/// Load/save contract for one named collection.
pub trait CollectionStore {
    /// Loads every raw record of `collection` in stored order.
    fn load(&self, collection: &str) -> StoreResult<Vec<RawRecord>>;
    /// Replaces the stored `collection` with `records`.
    fn save(&self, collection: &str, records: &[RawRecord]) -> StoreResult<()>;
}

/// Checks that `name` is usable as a collection key and file stem.
///
/// Accepts non-empty ASCII alphanumerics, `_` and `-`.
pub fn validate_collection_name(name: &str) -> StoreResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_collection_name;

    #[test]
    fn collection_names_must_be_plain_file_stems() {
        assert!(validate_collection_name("tasks").is_ok());
        assert!(validate_collection_name("team-users_2").is_ok());
        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name("../tasks").is_err());
        assert!(validate_collection_name("my tasks").is_err());
    }
}
