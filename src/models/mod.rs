//! # Host Models
//!
//! Concrete hosts the generated scopes run against. [`MemoryModel`] executes
//! merged options over in-memory JSON rows; the SQL host lives in
//! [`crate::query_builder`].

pub mod association;
mod executor;
pub mod memory;
pub mod record;

pub use association::{Association, AssociationKind};
pub use memory::{MemoryDatabase, MemoryModel};
pub use record::Record;
