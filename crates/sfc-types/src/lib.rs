//! Intent-model data types for the OVN SFC driver.
//!
//! These types mirror the northbound service-function-chaining model:
//! a [`PortChain`] steers traffic selected by its [`FlowClassifier`]s
//! through an ordered list of [`PortPairGroup`]s, each holding one or
//! more [`PortPair`]s (service-function attachment points).
//!
//! [`ChainAggregate`] is the self-contained shape the translation core
//! consumes: a chain with every referenced group, pair, and classifier
//! fetched and inlined, so the transaction builder never has to reach
//! back into the intent model.

mod chain;
mod classifier;

pub use chain::{ChainAggregate, GroupDetail, PortChain, PortPair, PortPairGroup};
pub use classifier::{fields, FlowClassifier};
