//! Repository layer over in-memory collections.
//!
//! # Responsibility
//! - Own one typed collection per repository and keep its file in sync.
//! - Enforce per-type validation and identifier allocation.
//!
//! # Invariants
//! - Validation and not-found failures never mutate the collection.
//! - Every successful mutation has been persisted before it returns.
//! - Mutations take `&mut self`; callers sharing a repository across
//!   threads must put each collection's repository behind its own lock.

pub mod entity_repo;
pub mod task_repo;
pub mod user_repo;
pub mod validation;
