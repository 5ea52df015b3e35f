//! Flow classifier model type and its control-plane projection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field names used in the control-plane projection of a classifier.
pub mod fields {
    /// L3 ethertype field
    pub const ETHERTYPE: &str = "ethertype";

    /// L4 protocol field
    pub const PROTOCOL: &str = "protocol";

    /// Source L4 port range lower bound
    pub const SOURCE_PORT_RANGE_MIN: &str = "source_port_range_min";

    /// Source L4 port range upper bound
    pub const SOURCE_PORT_RANGE_MAX: &str = "source_port_range_max";

    /// Destination L4 port range lower bound
    pub const DESTINATION_PORT_RANGE_MIN: &str = "destination_port_range_min";

    /// Destination L4 port range upper bound
    pub const DESTINATION_PORT_RANGE_MAX: &str = "destination_port_range_max";

    /// Source IP prefix field
    pub const SOURCE_IP_PREFIX: &str = "source_ip_prefix";

    /// Destination IP prefix field
    pub const DESTINATION_IP_PREFIX: &str = "destination_ip_prefix";
}

/// A traffic-match specification selecting which packets enter a chain.
///
/// The id, name, description, tenant, and L7 parameters exist only in
/// the intent model; [`FlowClassifier::match_fields`] produces the
/// reduced projection forwarded to the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowClassifier {
    /// Intent-model id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Owning tenant
    pub tenant_id: String,
    /// Logical port whose traffic enters the chain
    pub logical_source_port: Uuid,
    /// Logical port on the far side of the chain
    pub logical_destination_port: Uuid,
    /// L3 ethertype ("IPv4" / "IPv6")
    pub ethertype: String,
    /// L4 protocol ("tcp", "udp", ...)
    pub protocol: Option<String>,
    /// Source L4 port range
    pub source_port_range_min: Option<u16>,
    /// Source L4 port range
    pub source_port_range_max: Option<u16>,
    /// Destination L4 port range
    pub destination_port_range_min: Option<u16>,
    /// Destination L4 port range
    pub destination_port_range_max: Option<u16>,
    /// Source IP prefix (CIDR)
    pub source_ip_prefix: Option<String>,
    /// Destination IP prefix (CIDR)
    pub destination_ip_prefix: Option<String>,
    /// Opaque L7 parameters, intent-model only
    pub l7_parameters: BTreeMap<String, String>,
}

impl FlowClassifier {
    /// Creates a classifier matching all IPv4 traffic between two
    /// logical ports.
    pub fn new(id: Uuid, logical_source_port: Uuid, logical_destination_port: Uuid) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            tenant_id: String::new(),
            logical_source_port,
            logical_destination_port,
            ethertype: "IPv4".to_string(),
            protocol: None,
            source_port_range_min: None,
            source_port_range_max: None,
            destination_port_range_min: None,
            destination_port_range_max: None,
            source_ip_prefix: None,
            destination_ip_prefix: None,
            l7_parameters: BTreeMap::new(),
        }
    }

    /// Builds the immutable field projection emitted to the control
    /// plane.
    ///
    /// The projection never contains `id`, `name`, `description`,
    /// `tenant_id`, or `l7_parameters`; the logical port references are
    /// excluded too because the builder emits them separately after
    /// resolving them to control-plane row ids. The classifier itself
    /// is left untouched.
    pub fn match_fields(&self) -> Vec<(String, String)> {
        let mut fvs = vec![(fields::ETHERTYPE.to_string(), self.ethertype.clone())];

        if let Some(protocol) = &self.protocol {
            fvs.push((fields::PROTOCOL.to_string(), protocol.clone()));
        }
        if let Some(min) = self.source_port_range_min {
            fvs.push((fields::SOURCE_PORT_RANGE_MIN.to_string(), min.to_string()));
        }
        if let Some(max) = self.source_port_range_max {
            fvs.push((fields::SOURCE_PORT_RANGE_MAX.to_string(), max.to_string()));
        }
        if let Some(min) = self.destination_port_range_min {
            fvs.push((
                fields::DESTINATION_PORT_RANGE_MIN.to_string(),
                min.to_string(),
            ));
        }
        if let Some(max) = self.destination_port_range_max {
            fvs.push((
                fields::DESTINATION_PORT_RANGE_MAX.to_string(),
                max.to_string(),
            ));
        }
        if let Some(prefix) = &self.source_ip_prefix {
            fvs.push((fields::SOURCE_IP_PREFIX.to_string(), prefix.clone()));
        }
        if let Some(prefix) = &self.destination_ip_prefix {
            fvs.push((fields::DESTINATION_IP_PREFIX.to_string(), prefix.clone()));
        }

        fvs
    }
}
