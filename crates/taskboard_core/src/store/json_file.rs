//! JSON file backend for collection persistence.
//!
//! # Responsibility
//! - Map each collection to `<data_dir>/<collection>.json`.
//! - Write collections via temp file + rename so partial writes stay hidden.
//!
//! # Invariants
//! - The file shape is `{ "<collection>": [...], "lastModified": "<rfc3339>" }`.
//! - Temporary files live in the data directory and are never read back.

use super::{validate_collection_name, CollectionStore, RawRecord, StoreError, StoreResult};
use chrono::{SecondsFormat, Utc};
use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

const FILE_EXTENSION: &str = "json";
const LAST_MODIFIED_KEY: &str = "lastModified";

/// Stores each collection as a pretty-printed JSON document in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `data_dir`. The directory is created lazily.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the backing file for `collection`.
    pub fn collection_path(&self, collection: &str) -> StoreResult<PathBuf> {
        validate_collection_name(collection)?;
        Ok(self
            .data_dir
            .join(format!("{collection}.{FILE_EXTENSION}")))
    }

    /// Creates the data directory if missing. Safe to call repeatedly.
    pub fn ensure_data_dir(&self) -> StoreResult<()> {
        if self.data_dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.data_dir).map_err(|source| {
            error!(
                "event=data_dir_create module=store status=error path={} error={}",
                self.data_dir.display(),
                source
            );
            StoreError::CreateDir {
                path: self.data_dir.clone(),
                source,
            }
        })?;
        info!(
            "event=data_dir_create module=store status=ok path={}",
            self.data_dir.display()
        );
        Ok(())
    }
}

impl CollectionStore for JsonFileStore {
    fn load(&self, collection: &str) -> StoreResult<Vec<RawRecord>> {
        let path = self.collection_path(collection)?;
        let started_at = Instant::now();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    "event=collection_load module=store status=missing collection={} path={}",
                    collection,
                    path.display()
                );
                return Ok(Vec::new());
            }
            // Non-UTF-8 content is malformed, not an I/O failure.
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                warn!(
                    "event=collection_load module=store status=malformed collection={} path={} reason={}",
                    collection,
                    path.display(),
                    err
                );
                return Ok(Vec::new());
            }
            Err(source) => {
                error!(
                    "event=collection_load module=store status=error collection={} path={} error={}",
                    collection,
                    path.display(),
                    source
                );
                return Err(StoreError::Io { path, source });
            }
        };

        match parse_collection_document(collection, &content) {
            Ok(records) => {
                info!(
                    "event=collection_load module=store status=ok collection={} records={} duration_ms={}",
                    collection,
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(reason) => {
                warn!(
                    "event=collection_load module=store status=malformed collection={} path={} reason={}",
                    collection,
                    path.display(),
                    reason
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, collection: &str, records: &[RawRecord]) -> StoreResult<()> {
        let path = self.collection_path(collection)?;
        let started_at = Instant::now();
        self.ensure_data_dir()?;

        let mut document = Map::new();
        document.insert(collection.to_string(), Value::Array(records.to_vec()));
        document.insert(
            LAST_MODIFIED_KEY.to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        let content = serde_json::to_string_pretty(&Value::Object(document)).map_err(|source| {
            StoreError::Encode {
                collection: collection.to_string(),
                source,
            }
        })?;

        match write_atomic(&path, content.as_bytes()) {
            Ok(()) => {
                info!(
                    "event=collection_save module=store status=ok collection={} records={} duration_ms={}",
                    collection,
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=collection_save module=store status=error collection={} duration_ms={} error={}",
                    collection,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// Extracts the record array stored under `collection`.
fn parse_collection_document(collection: &str, content: &str) -> Result<Vec<RawRecord>, String> {
    let value: Value =
        serde_json::from_str(content).map_err(|err| format!("unparsable json: {err}"))?;
    let Value::Object(mut document) = value else {
        return Err("top-level value is not an object".to_string());
    };
    match document.remove(collection) {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(format!("`{collection}` is not an array")),
        None => Err(format!("missing `{collection}` array")),
    }
}

/// Sibling temp path, unique per write so stale leftovers never collide.
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()))
}

/// Writes `data` to `path` through a synced temp file and a rename.
fn write_atomic(path: &Path, data: &[u8]) -> StoreResult<()> {
    let temp_path = temp_path_for(path);

    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(source) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::Io {
            path: temp_path,
            source,
        });
    }

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::Rename {
            from: temp_path,
            to: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_collection_document, temp_path_for};
    use std::path::Path;

    #[test]
    fn parse_accepts_collection_array() {
        let records =
            parse_collection_document("tasks", r#"{"tasks":[{"id":1}],"lastModified":"x"}"#)
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], 1);
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        assert!(parse_collection_document("tasks", "not json").is_err());
        assert!(parse_collection_document("tasks", "[1, 2]").is_err());
        assert!(parse_collection_document("tasks", r#"{"users": []}"#).is_err());
        assert!(parse_collection_document("tasks", r#"{"tasks": {}}"#).is_err());
    }

    #[test]
    fn temp_path_is_a_hidden_sibling() {
        let target = Path::new("/data/tasks.json");
        let first = temp_path_for(target);
        let second = temp_path_for(target);

        assert_eq!(first.parent(), target.parent());
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".tasks.json."));
        assert!(name.ends_with(".tmp"));
        assert_ne!(first, second);
    }
}
