//! Subcommand handlers.

pub mod admin;
pub mod content;
