//! Application-level composition of the repositories.
//!
//! # Responsibility
//! - Build the task and user repositories from configuration.
//! - Keep callers free of store wiring details.

pub mod tracker_service;
