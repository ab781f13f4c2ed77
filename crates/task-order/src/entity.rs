//! Core Entity Trait
//!
//! Anything that can sit in an ordered list exposes a stable identifier.

use std::hash::Hash;

/// Core trait for orderable entities
pub trait Entity {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + Hash;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}
