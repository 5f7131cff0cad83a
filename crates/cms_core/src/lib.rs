//! Content repository core for the consultancy site.
//!
//! Stores typed content (services, solutions, team members, pricing plans)
//! in named collections, authenticates admins, and gates writes on the
//! current admin session.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CmsConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::admin::{AdminAccount, AdminIdentity, PasswordCredential};
pub use model::content_schemas;
pub use model::entity::{Entity, Stored};
pub use model::pricing_plan::PricingPlan;
pub use model::record::{Fields, Record, RecordId};
pub use model::service::Service;
pub use model::solution::Solution;
pub use model::team_member::{SocialLinks, TeamMember};
pub use model::validation::{parse_comma_list, ValidationError};
pub use repo::admin_repo::AdminDirectory;
pub use repo::collection_repo::{CollectionRepository, ErrorKind, RepoError, RepoResult};
pub use repo::memory_store::MemoryRecordStore;
pub use repo::record_store::{BackendError, RecordStore, StoreError, StoreResult};
pub use repo::session_repo::{
    FileSessionStore, MemorySessionStore, SessionError, SessionPersistence, SESSION_KEY,
};
pub use repo::sqlite_store::SqliteRecordStore;
pub use service::auth_service::{AuthError, Authenticator};
pub use service::console::{AccessError, AdminConsole, Catalog, ContentOverview, SignInError};
pub use service::session_service::SessionManager;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
