//! Read-only collaborator traits for the intent model and topology.
//!
//! The reference behavior located these collaborators through a
//! runtime service registry; here they are explicit capabilities
//! injected at driver construction. The flow-classifier service is
//! the one collaborator allowed to be absent, which callers model as
//! `Option<Arc<dyn ClassifierApi>>`.

use async_trait::async_trait;
use uuid::Uuid;

use sfc_types::{FlowClassifier, PortPair, PortPairGroup};

use crate::error::SfcResult;

/// A logical port as known to the topology collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalPortInfo {
    /// The port's id
    pub id: Uuid,
    /// The network owning the port
    pub network_id: Uuid,
}

/// Intent-model fetchers for SFC sub-resources.
#[async_trait]
pub trait SfcModelApi: Send + Sync {
    /// Fetches a port pair group by id.
    async fn get_port_pair_group(&self, id: Uuid) -> SfcResult<PortPairGroup>;

    /// Fetches a port pair by id.
    async fn get_port_pair(&self, id: Uuid) -> SfcResult<PortPair>;
}

/// Flow-classifier service fetcher.
#[async_trait]
pub trait ClassifierApi: Send + Sync {
    /// Fetches a flow classifier by id.
    async fn get_flow_classifier(&self, id: Uuid) -> SfcResult<FlowClassifier>;
}

/// Topology lookups, keyed by logical port id.
#[async_trait]
pub trait TopologyApi: Send + Sync {
    /// Returns the port's topology info, or `None` when the port does
    /// not exist.
    async fn get_port(&self, id: Uuid) -> SfcResult<Option<LogicalPortInfo>>;
}
