//! Persistence strategies for the admin session slot.
//!
//! # Responsibility
//! - Keep at most one serialized `AdminIdentity` under the fixed key
//!   `admin_user`.
//! - Let callers swap the strategy (local file, memory, or a future
//!   server-validated token) without touching the session manager.
//!
//! # Invariants
//! - An absent slot means anonymous.
//! - `clear` on an empty slot succeeds.
//! - File writes go through a temp file + rename, so a crash never leaves
//!   a half-written slot.

use crate::model::admin::AdminIdentity;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Fixed key of the persisted session slot.
pub const SESSION_KEY: &str = "admin_user";

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    Io(std::io::Error),
    /// Slot content is not a serialized identity.
    Corrupt(serde_json::Error),
    Poisoned,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "session storage error: {err}"),
            Self::Corrupt(err) => write!(f, "persisted session is unreadable: {err}"),
            Self::Poisoned => write!(f, "session slot lock poisoned"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Corrupt(err) => Some(err),
            Self::Poisoned => None,
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Corrupt(value)
    }
}

/// Durable slot holding the current identity, if any.
pub trait SessionPersistence {
    fn load(&self) -> SessionResult<Option<AdminIdentity>>;
    fn save(&self, identity: &AdminIdentity) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// Session slot stored as `<state_dir>/admin_user.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(format!("{SESSION_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionPersistence for FileSessionStore {
    fn load(&self) -> SessionResult<Option<AdminIdentity>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, identity: &AdminIdentity) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec(identity)?)?;
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Non-durable slot. State ends with the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw serialized slot content.
    pub fn raw(&self) -> SessionResult<Option<String>> {
        Ok(self.slot.lock().map_err(|_| SessionError::Poisoned)?.clone())
    }

    /// Overwrites the raw slot content.
    pub fn set_raw(&self, value: Option<String>) -> SessionResult<()> {
        *self.slot.lock().map_err(|_| SessionError::Poisoned)? = value;
        Ok(())
    }
}

impl SessionPersistence for MemorySessionStore {
    fn load(&self) -> SessionResult<Option<AdminIdentity>> {
        match self.raw()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, identity: &AdminIdentity) -> SessionResult<()> {
        self.set_raw(Some(serde_json::to_string(identity)?))
    }

    fn clear(&self) -> SessionResult<()> {
        self.set_raw(None)
    }
}

impl<P: SessionPersistence + ?Sized> SessionPersistence for Box<P> {
    fn load(&self) -> SessionResult<Option<AdminIdentity>> {
        (**self).load()
    }

    fn save(&self, identity: &AdminIdentity) -> SessionResult<()> {
        (**self).save(identity)
    }

    fn clear(&self) -> SessionResult<()> {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::{FileSessionStore, MemorySessionStore, SessionError, SessionPersistence};
    use crate::model::admin::AdminIdentity;
    use uuid::Uuid;

    fn identity() -> AdminIdentity {
        AdminIdentity {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn file_slot_round_trips_and_clears() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("state"));
        assert!(store.load().expect("load empty").is_none());

        let admin = identity();
        store.save(&admin).expect("save");
        assert!(store.path().exists());
        assert_eq!(store.load().expect("load"), Some(admin));

        store.clear().expect("clear");
        store.clear().expect("clear is idempotent");
        assert!(!store.path().exists());
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path());
        // A non-empty directory in the slot's place makes the rename fail.
        std::fs::create_dir(store.path()).expect("block slot");
        std::fs::write(store.path().join("keep"), b"x").expect("fill dir");

        assert!(matches!(store.save(&identity()), Err(SessionError::Io(_))));
        assert!(!store.path().with_extension("json.tmp").exists());
        assert!(store.path().is_dir());
    }

    #[test]
    fn corrupt_slot_is_reported() {
        let store = MemorySessionStore::new();
        store.set_raw(Some("{not json".to_string())).expect("set raw");
        assert!(matches!(store.load(), Err(SessionError::Corrupt(_))));
    }
}
