//! In-memory intent-model and topology collaborators.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use sfc_common::{
    ClassifierApi, LogicalPortInfo, RefKind, SfcError, SfcModelApi, SfcResult, TopologyApi,
};
use sfc_types::{FlowClassifier, PortPair, PortPairGroup};

/// In-memory SFC intent model.
#[derive(Debug, Default)]
pub struct MemoryModel {
    groups: Mutex<HashMap<Uuid, PortPairGroup>>,
    pairs: Mutex<HashMap<Uuid, PortPair>>,
}

impl MemoryModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a port pair group.
    pub fn add_group(&self, group: PortPairGroup) {
        self.groups
            .lock()
            .expect("model lock poisoned")
            .insert(group.id, group);
    }

    /// Registers a port pair.
    pub fn add_port_pair(&self, pair: PortPair) {
        self.pairs
            .lock()
            .expect("model lock poisoned")
            .insert(pair.id, pair);
    }
}

#[async_trait]
impl SfcModelApi for MemoryModel {
    async fn get_port_pair_group(&self, id: Uuid) -> SfcResult<PortPairGroup> {
        self.groups
            .lock()
            .expect("model lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| SfcError::reference_not_found(RefKind::PortPairGroup, id))
    }

    async fn get_port_pair(&self, id: Uuid) -> SfcResult<PortPair> {
        self.pairs
            .lock()
            .expect("model lock poisoned")
            .get(&id)
            .copied()
            .ok_or_else(|| SfcError::reference_not_found(RefKind::PortPair, id))
    }
}

/// In-memory topology: logical port id -> owning network id.
#[derive(Debug, Default)]
pub struct MemoryTopology {
    ports: Mutex<HashMap<Uuid, Uuid>>,
}

impl MemoryTopology {
    /// Creates an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a port on a network.
    pub fn add_port(&self, port_id: Uuid, network_id: Uuid) {
        self.ports
            .lock()
            .expect("topology lock poisoned")
            .insert(port_id, network_id);
    }
}

#[async_trait]
impl TopologyApi for MemoryTopology {
    async fn get_port(&self, id: Uuid) -> SfcResult<Option<LogicalPortInfo>> {
        Ok(self
            .ports
            .lock()
            .expect("topology lock poisoned")
            .get(&id)
            .map(|network_id| LogicalPortInfo {
                id,
                network_id: *network_id,
            }))
    }
}

/// In-memory flow-classifier service.
#[derive(Debug, Default)]
pub struct MemoryClassifiers {
    classifiers: Mutex<HashMap<Uuid, FlowClassifier>>,
}

impl MemoryClassifiers {
    /// Creates an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a classifier.
    pub fn add(&self, fc: FlowClassifier) {
        self.classifiers
            .lock()
            .expect("classifier lock poisoned")
            .insert(fc.id, fc);
    }
}

#[async_trait]
impl ClassifierApi for MemoryClassifiers {
    async fn get_flow_classifier(&self, id: Uuid) -> SfcResult<FlowClassifier> {
        self.classifiers
            .lock()
            .expect("classifier lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| SfcError::reference_not_found(RefKind::FlowClassifier, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_model_round_trip() {
        let model = MemoryModel::new();
        let pair = PortPair::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        model.add_port_pair(pair);
        model.add_group(PortPairGroup::new(Uuid::new_v4(), vec![pair.id]));

        assert_eq!(model.get_port_pair(pair.id).await.unwrap(), pair);
        assert!(model.get_port_pair(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_topology_lookup() {
        let topology = MemoryTopology::new();
        let port = Uuid::new_v4();
        let network = Uuid::new_v4();
        topology.add_port(port, network);

        let info = topology.get_port(port).await.unwrap().unwrap();
        assert_eq!(info.network_id, network);
        assert!(topology.get_port(Uuid::new_v4()).await.unwrap().is_none());
    }
}
