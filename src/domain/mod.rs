//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has no I/O; serde is its only external concern.

mod entity;
mod unit;
mod annotation;
mod profile;

pub use entity::{Entity, DomainError, DomainResult};
pub use unit::{Unit, UnitId, UnitPatch, Priority, TaskSpecific};
pub use annotation::Annotation;
pub use profile::{AuthIdentity, Role, UserProfile};
