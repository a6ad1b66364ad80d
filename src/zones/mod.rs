//! Zone storage.
//!
//! The named zones themselves (`Zone`) live in `core::config`; this module
//! provides `Pile`, the ordered collection every zone is stored in.
//!
//! ## Key Types
//!
//! - `Pile`: Ordered card collection with ID-based lookup and removal
//! - `ZonePosition`: Position specifier for inserting into a pile

pub mod pile;

pub use pile::{Pile, ZonePosition};

// Re-export zone types from core for convenience
pub use crate::core::config::{Zone, ZoneVisibility};
