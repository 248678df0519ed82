//! `sellerhub-core` — shared building blocks.
//!
//! Pure primitives only: identifiers, the entity trait, domain errors and the
//! field-level validation result. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;
pub mod validation;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{ProductId, SellerId};
pub use validation::{FieldErrors, Validated};
