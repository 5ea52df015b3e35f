//! Common abstractions for the OVN SFC driver.
//!
//! This crate provides the seams between the translation core and its
//! external collaborators:
//!
//! - [`NbApi`]: the northbound control-plane database (indexed row
//!   lookup plus atomic transaction commit)
//! - [`Transaction`] / [`NbOp`]: typed row mutations queued and
//!   committed as a unit
//! - [`SfcModelApi`], [`ClassifierApi`], [`TopologyApi`]: read-only
//!   intent-model and topology collaborators, constructor-injected
//! - [`error`]: the error taxonomy shared by all SFC crates
//!
//! # Architecture
//!
//! The translation pipeline runs once per lifecycle event:
//!
//! 1. The chain assembler fetches sub-resources via the model traits
//! 2. The topology resolver reads switches and ports via [`NbApi`]
//! 3. The transaction builder queues [`NbOp`]s into one [`Transaction`]
//! 4. [`NbApi::commit`] applies every op or none of them
//!
//! No row this pipeline creates is ever visible until the final commit
//! succeeds, so the control plane never observes a half-installed chain.

pub mod error;
pub mod nb;
pub mod plugin;

// Re-export commonly used items at crate root
pub use error::{RefKind, SfcError, SfcResult};
pub use nb::{columns, tables, FieldValue, FieldValues, NbApi, NbOp, Row, Transaction};
pub use plugin::{ClassifierApi, LogicalPortInfo, SfcModelApi, TopologyApi};
