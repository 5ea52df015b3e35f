//! SfcDriver - lifecycle facade over the translation pipeline.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use sfc_common::{ClassifierApi, NbApi, SfcModelApi, SfcResult, TopologyApi};
use sfc_types::{PortChain, PortPairGroup};

use crate::assembler::ChainAssembler;
use crate::builder::TransactionBuilder;
use crate::topology::TopologyResolver;

/// Outcome of a lifecycle operation.
///
/// Operations the driver does not translate report `Unsupported`
/// explicitly instead of succeeding silently, so callers can tell a
/// realized change from a skipped one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    /// The control plane was mutated.
    Applied,
    /// The operation is not translated by this driver.
    Unsupported,
}

impl ApplyStatus {
    /// Returns true if the control plane was mutated.
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyStatus::Applied)
    }
}

/// OVN SFC driver.
///
/// One instance per process, constructed with its collaborators; the
/// northbound handle's lifetime is tied to the driver. Lifecycle
/// events are processed one at a time: each call resolves, queues,
/// and commits (or aborts) before returning.
pub struct SfcDriver {
    assembler: ChainAssembler,
    builder: TransactionBuilder,
}

impl SfcDriver {
    /// Creates a driver.
    ///
    /// `classifiers` is `None` when the flow-classifier service is not
    /// deployed; chains then build without steering rules.
    pub fn new(
        nb: Arc<dyn NbApi>,
        topology: Arc<dyn TopologyApi>,
        model: Arc<dyn SfcModelApi>,
        classifiers: Option<Arc<dyn ClassifierApi>>,
    ) -> Self {
        let resolver = TopologyResolver::new(nb.clone(), topology);
        Self {
            assembler: ChainAssembler::new(model, classifiers),
            builder: TransactionBuilder::new(nb, resolver),
        }
    }

    /// Realizes a newly created port chain in the control plane.
    #[instrument(skip(self, chain), fields(chain_id = %chain.id))]
    pub async fn create_port_chain(&self, chain: &PortChain) -> SfcResult<ApplyStatus> {
        let aggregate = self.assembler.assemble(chain).await?;
        self.builder.build_create(&aggregate).await?;
        info!(chain_id = %chain.id, "created port chain");
        Ok(ApplyStatus::Applied)
    }

    /// Tears down a deleted port chain, reversing every row created at
    /// build time.
    #[instrument(skip(self, chain), fields(chain_id = %chain.id))]
    pub async fn delete_port_chain(&self, chain: &PortChain) -> SfcResult<ApplyStatus> {
        let aggregate = self.assembler.assemble(chain).await?;
        self.builder.build_delete(&aggregate).await?;
        info!(chain_id = %chain.id, "deleted port chain");
        Ok(ApplyStatus::Applied)
    }

    /// Port chain update is not translated; chains are immutable after
    /// creation.
    #[instrument(skip(self, chain), fields(chain_id = %chain.id))]
    pub async fn update_port_chain(&self, chain: &PortChain) -> SfcResult<ApplyStatus> {
        warn!(chain_id = %chain.id, "port chain update is not supported");
        Ok(ApplyStatus::Unsupported)
    }

    /// Port pair group creation is handled as part of chain creation.
    #[instrument(skip(self, group), fields(group_id = %group.id))]
    pub async fn create_port_pair_group(&self, group: &PortPairGroup) -> SfcResult<ApplyStatus> {
        warn!(group_id = %group.id, "standalone port pair group create is not supported");
        Ok(ApplyStatus::Unsupported)
    }

    /// Port pair group update is not translated.
    #[instrument(skip(self, group), fields(group_id = %group.id))]
    pub async fn update_port_pair_group(&self, group: &PortPairGroup) -> SfcResult<ApplyStatus> {
        warn!(group_id = %group.id, "port pair group update is not supported");
        Ok(ApplyStatus::Unsupported)
    }

    /// Port pair group deletion is handled as part of chain deletion.
    #[instrument(skip(self, group), fields(group_id = %group.id))]
    pub async fn delete_port_pair_group(&self, group: &PortPairGroup) -> SfcResult<ApplyStatus> {
        warn!(group_id = %group.id, "standalone port pair group delete is not supported");
        Ok(ApplyStatus::Unsupported)
    }

    /// Port pair creation is handled as part of chain creation.
    pub async fn create_port_pair(&self, pair_id: uuid::Uuid) -> SfcResult<ApplyStatus> {
        warn!(%pair_id, "standalone port pair create is not supported");
        Ok(ApplyStatus::Unsupported)
    }

    /// Port pair update is not translated.
    pub async fn update_port_pair(&self, pair_id: uuid::Uuid) -> SfcResult<ApplyStatus> {
        warn!(%pair_id, "port pair update is not supported");
        Ok(ApplyStatus::Unsupported)
    }

    /// Port pair deletion is handled as part of chain deletion.
    pub async fn delete_port_pair(&self, pair_id: uuid::Uuid) -> SfcResult<ApplyStatus> {
        warn!(%pair_id, "standalone port pair delete is not supported");
        Ok(ApplyStatus::Unsupported)
    }

    /// Re-sets a group row's member list in the control plane.
    ///
    /// Internal maintenance entry point; every member pair row must
    /// already exist.
    #[instrument(skip(self, group), fields(group_id = %group.id))]
    pub async fn set_port_pair_group(&self, group: &PortPairGroup) -> SfcResult<ApplyStatus> {
        self.builder.set_port_pair_group(group).await?;
        Ok(ApplyStatus::Applied)
    }
}
