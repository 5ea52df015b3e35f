//! Topology resolution: logical ports to switches and row ids.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use sfc_common::{columns, tables, NbApi, SfcResult, TopologyApi};

use crate::names::switch_name;

/// Resolves intent-model port references against the topology and the
/// northbound database.
///
/// All lookups are read-only; `Ok(None)` means the reference could not
/// be resolved, which callers turn into a build failure. Resolution
/// never creates rows.
#[derive(Clone)]
pub struct TopologyResolver {
    nb: Arc<dyn NbApi>,
    topology: Arc<dyn TopologyApi>,
}

impl TopologyResolver {
    /// Creates a resolver over the given northbound and topology handles.
    pub fn new(nb: Arc<dyn NbApi>, topology: Arc<dyn TopologyApi>) -> Self {
        Self { nb, topology }
    }

    /// Resolves the logical switch owning a port.
    ///
    /// Walks port -> owning network -> switch name, then confirms the
    /// switch row exists in the northbound database.
    pub async fn resolve_switch(&self, port_id: Uuid) -> SfcResult<Option<String>> {
        let port = match self.topology.get_port(port_id).await? {
            Some(port) => port,
            None => {
                warn!(%port_id, "logical port not known to the topology");
                return Ok(None);
            }
        };

        let name = switch_name(port.network_id);
        match self
            .nb
            .find_row(tables::LOGICAL_SWITCH, columns::NAME, &name)
            .await?
        {
            Some(_) => Ok(Some(name)),
            None => {
                warn!(switch = %name, %port_id, "logical switch row does not exist for port");
                Ok(None)
            }
        }
    }

    /// Resolves a logical port to its northbound row id.
    pub async fn resolve_port(&self, port_id: Uuid) -> SfcResult<Option<Uuid>> {
        let row = self
            .nb
            .find_row(
                tables::LOGICAL_SWITCH_PORT,
                columns::NAME,
                &port_id.to_string(),
            )
            .await?;
        if row.is_none() {
            warn!(%port_id, "logical port row does not exist");
        }
        Ok(row.map(|r| r.uuid))
    }

    /// Resolves a port pair row by name to its row id.
    pub async fn resolve_port_pair(&self, row_name: &str) -> SfcResult<Option<Uuid>> {
        let row = self
            .nb
            .find_row(tables::LOGICAL_PORT_PAIR, columns::NAME, row_name)
            .await?;
        if row.is_none() {
            warn!(name = %row_name, "logical port pair row does not exist");
        }
        Ok(row.map(|r| r.uuid))
    }

    /// Resolves a flow classifier row by name to its row id.
    pub async fn resolve_flow_classifier(&self, row_name: &str) -> SfcResult<Option<Uuid>> {
        let row = self
            .nb
            .find_row(tables::LOGICAL_FLOW_CLASSIFIER, columns::NAME, row_name)
            .await?;
        if row.is_none() {
            warn!(name = %row_name, "logical flow classifier row does not exist");
        }
        Ok(row.map(|r| r.uuid))
    }
}
