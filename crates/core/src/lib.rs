//! `lodgebase-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by every entity kind:
//! identifiers, timestamps, the error model and field validators. No storage,
//! no relationships between entity kinds.

pub mod entity;
pub mod error;
pub mod id;
pub mod validate;

pub use entity::{Entity, Record, Timestamps};
pub use error::{DomainError, DomainResult, ErrorKind, from_attributes};
pub use id::{AmenityId, PlaceId, ReviewId, UserId};
