//! Process-wide admin session.
//!
//! # Responsibility
//! - Hold zero or one authenticated `AdminIdentity`.
//! - Mirror that state into a pluggable `SessionPersistence` slot so a
//!   restart can resume an authenticated session.
//!
//! # Invariants
//! - States are Anonymous and Authenticated(identity); a second `login`
//!   replaces the held identity.
//! - `login` persists before switching state; a failed save leaves the
//!   previous state in place.
//! - `logout` always ends the in-process session, even when erasing the
//!   persisted slot fails.
//! - Readers never block each other.

use crate::model::admin::AdminIdentity;
use crate::repo::session_repo::{SessionPersistence, SessionResult};
use log::{info, warn};
use std::sync::{PoisonError, RwLock};

/// Current admin session plus its persistence strategy.
pub struct SessionManager<P> {
    persistence: P,
    current: RwLock<Option<AdminIdentity>>,
}

impl<P: SessionPersistence> SessionManager<P> {
    /// Builds a manager seeded from whatever `persistence` holds.
    ///
    /// An unreadable slot is logged, erased and treated as anonymous.
    pub fn restore(persistence: P) -> Self {
        let restored = match persistence.load() {
            Ok(identity) => identity,
            Err(err) => {
                warn!("event=session_restore module=session status=error error={err}");
                if let Err(clear_err) = persistence.clear() {
                    warn!(
                        "event=session_clear module=session status=error error={clear_err}"
                    );
                }
                None
            }
        };

        if let Some(identity) = &restored {
            info!(
                "event=session_restore module=session status=ok id={}",
                identity.id
            );
        }

        Self {
            persistence,
            current: RwLock::new(restored),
        }
    }

    /// Adopts `identity` as the current session.
    pub fn login(&self, identity: AdminIdentity) -> SessionResult<()> {
        self.persistence.save(&identity)?;
        info!("event=session_login module=session status=ok id={}", identity.id);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(identity);
        Ok(())
    }

    /// Ends the current session and erases its persisted trace.
    pub fn logout(&self) -> SessionResult<()> {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.persistence.clear()?;
        if let Some(identity) = previous {
            info!("event=session_logout module=session status=ok id={}", identity.id);
        }
        Ok(())
    }

    pub fn current_identity(&self) -> Option<AdminIdentity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }
}
