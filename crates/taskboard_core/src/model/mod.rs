//! Record shapes for the task tracker collections.
//!
//! # Responsibility
//! - Define `Task` and `User` value types and their wire shape.
//! - Provide the category/status vocabularies consumed by tasks.
//!
//! # Invariants
//! - Records carry no behavior beyond shape conversion and summaries.
//! - Wire field names are camelCase to match the persisted files.

pub mod task;
pub mod user;
pub mod vocab;
