//! Repository layer: storage contracts and their implementations.
//!
//! # Responsibility
//! - Define the backend-agnostic record store and typed collection access.
//! - Isolate SQLite, memory and file details from the service layer.
//!
//! # Invariants
//! - Write paths validate before touching storage.
//! - Errors are semantic (`Validation`, `NotFound`, `BackendUnavailable`),
//!   never raw driver errors.

pub mod admin_repo;
pub mod collection_repo;
pub mod memory_store;
pub mod record_store;
pub mod session_repo;
pub mod sqlite_store;
