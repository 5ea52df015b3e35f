//! Port chain, port pair group, and port pair model types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::FlowClassifier;

/// A service function chain as defined in the intent model.
///
/// The group and classifier lists hold references by id; the chain
/// assembler turns them into a [`ChainAggregate`] before translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortChain {
    /// Intent-model id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Owning tenant
    pub tenant_id: String,
    /// Free-form description
    pub description: String,
    /// Ordered port pair group references (hop order)
    pub port_pair_groups: Vec<Uuid>,
    /// Flow classifier references
    pub flow_classifiers: Vec<Uuid>,
}

impl PortChain {
    /// Creates a chain with no groups or classifiers.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tenant_id: String::new(),
            description: String::new(),
            port_pair_groups: Vec::new(),
            flow_classifiers: Vec::new(),
        }
    }

    /// Appends a port pair group reference.
    pub fn with_group(mut self, group_id: Uuid) -> Self {
        self.port_pair_groups.push(group_id);
        self
    }

    /// Appends a flow classifier reference.
    pub fn with_classifier(mut self, classifier_id: Uuid) -> Self {
        self.flow_classifiers.push(classifier_id);
        self
    }
}

/// A set of equivalent service-function instances at one chain hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortPairGroup {
    /// Intent-model id
    pub id: Uuid,
    /// Member port pair references
    pub port_pairs: Vec<Uuid>,
}

impl PortPairGroup {
    /// Creates a group with the given member pairs.
    pub fn new(id: Uuid, port_pairs: Vec<Uuid>) -> Self {
        Self { id, port_pairs }
    }
}

/// One service-function instance's ingress and egress attachment points.
///
/// Both ports are logical-port ids owned by the topology, not by the
/// SFC model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortPair {
    /// Intent-model id
    pub id: Uuid,
    /// Logical port receiving traffic into the service function
    pub ingress: Uuid,
    /// Logical port returning traffic from the service function
    pub egress: Uuid,
}

impl PortPair {
    /// Creates a port pair.
    pub fn new(id: Uuid, ingress: Uuid, egress: Uuid) -> Self {
        Self {
            id,
            ingress,
            egress,
        }
    }
}

/// A port pair group with its member pairs fetched in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDetail {
    /// Group id
    pub id: Uuid,
    /// Member pairs, fully resolved
    pub port_pairs: Vec<PortPair>,
}

/// A port chain with every referenced sub-resource inlined.
///
/// This is the only representation the transaction builder consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAggregate {
    /// Chain id
    pub id: Uuid,
    /// Chain display name
    pub name: String,
    /// Owning tenant
    pub tenant_id: String,
    /// Free-form description
    pub description: String,
    /// Groups in hop order, pairs inlined
    pub groups: Vec<GroupDetail>,
    /// Classifiers, fully fetched (empty when the classifier service
    /// is unavailable)
    pub flow_classifiers: Vec<FlowClassifier>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_chain_builder() {
        let group = Uuid::new_v4();
        let fc = Uuid::new_v4();
        let chain = PortChain::new(Uuid::new_v4(), "chain1")
            .with_group(group)
            .with_classifier(fc);

        assert_eq!(chain.name, "chain1");
        assert_eq!(chain.port_pair_groups, vec![group]);
        assert_eq!(chain.flow_classifiers, vec![fc]);
    }

    #[test]
    fn test_port_pair_new() {
        let ingress = Uuid::new_v4();
        let egress = Uuid::new_v4();
        let pair = PortPair::new(Uuid::new_v4(), ingress, egress);

        assert_eq!(pair.ingress, ingress);
        assert_eq!(pair.egress, egress);
    }

    #[test]
    fn test_chain_serde_round_trip() {
        let chain = PortChain::new(Uuid::new_v4(), "chain1").with_group(Uuid::new_v4());
        let json = serde_json::to_string(&chain).unwrap();
        let back: PortChain = serde_json::from_str(&json).unwrap();
        assert_eq!(chain, back);
    }
}
