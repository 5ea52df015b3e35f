//! Test infrastructure for the OVN SFC driver
//!
//! Provides:
//! - In-memory northbound database with atomic commit semantics
//! - In-memory intent-model and topology collaborators
//! - Fixtures for common chain shapes

pub mod fixtures;
mod memdb;
mod model;

pub use fixtures::*;
pub use memdb::MemoryNb;
pub use model::{MemoryClassifiers, MemoryModel, MemoryTopology};
