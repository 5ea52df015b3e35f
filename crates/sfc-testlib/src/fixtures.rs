//! Test fixtures for common SFC model shapes
//!
//! Provides reusable builders for chains, pairs, and classifiers used
//! across driver tests.

use uuid::Uuid;

use sfc_types::{FlowClassifier, PortChain, PortPair, PortPairGroup};

/// A classifier matching all IPv4 traffic between two logical ports.
pub fn classifier(source_port: Uuid, destination_port: Uuid) -> FlowClassifier {
    FlowClassifier::new(Uuid::new_v4(), source_port, destination_port)
}

/// A TCP classifier with a destination port range, plus the
/// intent-only descriptive fields populated so stripping is exercised.
pub fn tcp_classifier(source_port: Uuid, destination_port: Uuid) -> FlowClassifier {
    let mut fc = classifier(source_port, destination_port);
    fc.name = "tcp-traffic".to_string();
    fc.description = "steer tcp traffic through the chain".to_string();
    fc.tenant_id = "tenant1".to_string();
    fc.protocol = Some("tcp".to_string());
    fc.destination_port_range_min = Some(80);
    fc.destination_port_range_max = Some(8080);
    fc.l7_parameters
        .insert("url_filter".to_string(), "/api".to_string());
    fc
}

/// A port pair over the given attachment points.
pub fn port_pair(ingress: Uuid, egress: Uuid) -> PortPair {
    PortPair::new(Uuid::new_v4(), ingress, egress)
}

/// A single-member group for a pair.
pub fn group_of(pairs: &[PortPair]) -> PortPairGroup {
    PortPairGroup::new(Uuid::new_v4(), pairs.iter().map(|p| p.id).collect())
}

/// A chain referencing the given groups and classifiers.
pub fn chain(groups: &[PortPairGroup], classifiers: &[FlowClassifier]) -> PortChain {
    let mut chain = PortChain::new(Uuid::new_v4(), "test-chain");
    chain.tenant_id = "tenant1".to_string();
    for group in groups {
        chain = chain.with_group(group.id);
    }
    for fc in classifiers {
        chain = chain.with_classifier(fc.id);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcp_classifier_has_intent_fields() {
        let fc = tcp_classifier(Uuid::new_v4(), Uuid::new_v4());
        assert!(!fc.name.is_empty());
        assert!(!fc.tenant_id.is_empty());
        assert!(!fc.l7_parameters.is_empty());
        assert_eq!(fc.protocol.as_deref(), Some("tcp"));
    }

    #[test]
    fn test_chain_references_fixtures() {
        let pair = port_pair(Uuid::new_v4(), Uuid::new_v4());
        let group = group_of(&[pair]);
        let fc = classifier(Uuid::new_v4(), Uuid::new_v4());
        let chain = chain(&[group.clone()], &[fc.clone()]);

        assert_eq!(chain.port_pair_groups, vec![group.id]);
        assert_eq!(chain.flow_classifiers, vec![fc.id]);
    }
}
