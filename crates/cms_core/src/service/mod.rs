//! Use-case services on top of the repository layer.
//!
//! # Responsibility
//! - Authenticate admins and hold the resulting session.
//! - Gate content writes on that session.
//!
//! # See also
//! - `repo` for storage contracts.

pub mod auth_service;
pub mod console;
pub mod session_service;
