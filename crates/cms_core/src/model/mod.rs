//! Content domain model.
//!
//! # Responsibility
//! - Define the record envelope, collection shapes and typed entities.
//! - Keep validation rules next to the types they protect.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `RecordId`.
//! - Collections are independent; no cross-collection references are
//!   enforced.

pub mod admin;
pub mod entity;
pub mod pricing_plan;
pub mod record;
pub mod schema;
pub mod service;
pub mod solution;
pub mod team_member;
pub mod validation;

use crate::model::entity::Entity;
use crate::model::schema::SchemaRegistry;

/// Shapes of every collection this crate manages.
pub fn content_schemas() -> SchemaRegistry {
    SchemaRegistry::new()
        .with(*service::Service::schema())
        .with(*solution::Solution::schema())
        .with(*team_member::TeamMember::schema())
        .with(*pricing_plan::PricingPlan::schema())
        .with(*admin::AdminAccount::schema())
}
