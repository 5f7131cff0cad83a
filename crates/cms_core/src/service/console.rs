//! Admin console: content access gated on the current session.
//!
//! # Responsibility
//! - Give read-only access to every collection to anyone holding a console.
//! - Give write access only while an admin session is active.
//! - Wire sign-in (authenticator -> session manager) for front ends.
//!
//! # Invariants
//! - Store and session are injected; nothing here reaches for globals.
//! - The session gate is checked when an editor is requested.

use crate::model::admin::AdminIdentity;
use crate::model::entity::{Entity, Stored};
use crate::model::pricing_plan::PricingPlan;
use crate::model::record::RecordId;
use crate::model::service::Service;
use crate::model::solution::Solution;
use crate::model::team_member::TeamMember;
use crate::repo::collection_repo::{CollectionRepository, RepoResult};
use crate::repo::record_store::RecordStore;
use crate::repo::session_repo::{SessionError, SessionPersistence};
use crate::service::auth_service::{AuthError, Authenticator};
use crate::service::session_service::SessionManager;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Write attempted without an admin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    NotAuthenticated,
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "admin login required"),
        }
    }
}

impl Error for AccessError {}

#[derive(Debug)]
pub enum SignInError {
    Auth(AuthError),
    Session(SessionError),
}

impl Display for SignInError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth(err) => write!(f, "{err}"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SignInError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Auth(err) => Some(err),
            Self::Session(err) => Some(err),
        }
    }
}

impl From<AuthError> for SignInError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<SessionError> for SignInError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

/// Record counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentOverview {
    pub services: usize,
    pub solutions: usize,
    pub team_members: usize,
    pub pricing_plans: usize,
}

/// Read-only view of one collection.
pub struct Catalog<'a, T, S: ?Sized> {
    repo: CollectionRepository<'a, T, S>,
}

impl<T: Entity, S: RecordStore + ?Sized> Catalog<'_, T, S> {
    /// All entities, newest first.
    pub fn get_all(&self) -> RepoResult<Vec<Stored<T>>> {
        self.repo.get_all()
    }

    pub fn get(&self, id: RecordId) -> RepoResult<Option<Stored<T>>> {
        self.repo.get(id)
    }
}

/// Session-aware entry point to the content collections.
pub struct AdminConsole<'a, S: ?Sized, P> {
    store: &'a S,
    session: &'a SessionManager<P>,
}

impl<'a, S: RecordStore + ?Sized, P: SessionPersistence> AdminConsole<'a, S, P> {
    pub fn new(store: &'a S, session: &'a SessionManager<P>) -> Self {
        Self { store, session }
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    pub fn session(&self) -> &'a SessionManager<P> {
        self.session
    }

    /// Read access to the `T` collection.
    pub fn catalog<T: Entity>(&self) -> Catalog<'a, T, S> {
        Catalog {
            repo: CollectionRepository::new(self.store),
        }
    }

    /// Write access to the `T` collection, for authenticated admins only.
    pub fn editor<T: Entity>(&self) -> Result<CollectionRepository<'a, T, S>, AccessError> {
        if !self.session.is_authenticated() {
            return Err(AccessError::NotAuthenticated);
        }
        Ok(CollectionRepository::new(self.store))
    }

    /// Authenticates and adopts the identity as the current session.
    pub fn sign_in(&self, username: &str, password: &str) -> Result<AdminIdentity, SignInError> {
        let identity = Authenticator::new(self.store).login(username, password)?;
        self.session.login(identity.clone())?;
        Ok(identity)
    }

    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.session.logout()
    }

    pub fn overview(&self) -> RepoResult<ContentOverview> {
        Ok(ContentOverview {
            services: self.catalog::<Service>().get_all()?.len(),
            solutions: self.catalog::<Solution>().get_all()?.len(),
            team_members: self.catalog::<TeamMember>().get_all()?.len(),
            pricing_plans: self.catalog::<PricingPlan>().get_all()?.len(),
        })
    }
}
