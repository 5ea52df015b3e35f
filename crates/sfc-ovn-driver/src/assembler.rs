//! Chain assembly: inlining a chain's sub-resources into one aggregate.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use sfc_common::{ClassifierApi, SfcModelApi, SfcResult};
use sfc_types::{ChainAggregate, FlowClassifier, GroupDetail, PortChain};

/// Gathers a port chain's groups, pairs, and classifiers from the
/// intent model into one self-contained [`ChainAggregate`].
pub struct ChainAssembler {
    model: Arc<dyn SfcModelApi>,
    classifiers: Option<Arc<dyn ClassifierApi>>,
}

impl ChainAssembler {
    /// Creates an assembler.
    ///
    /// `classifiers` may be `None` when the flow-classifier service is
    /// not deployed; chains then assemble with an empty classifier
    /// list and no traffic is steered until it appears.
    pub fn new(model: Arc<dyn SfcModelApi>, classifiers: Option<Arc<dyn ClassifierApi>>) -> Self {
        Self { model, classifiers }
    }

    /// Builds the aggregate for a chain.
    pub async fn assemble(&self, chain: &PortChain) -> SfcResult<ChainAggregate> {
        let mut groups = Vec::with_capacity(chain.port_pair_groups.len());
        for group_id in &chain.port_pair_groups {
            let group = self.model.get_port_pair_group(*group_id).await?;

            let mut port_pairs = Vec::with_capacity(group.port_pairs.len());
            for pair_id in &group.port_pairs {
                debug!(%pair_id, %group_id, "fetching port pair detail");
                port_pairs.push(self.model.get_port_pair(*pair_id).await?);
            }

            groups.push(GroupDetail {
                id: *group_id,
                port_pairs,
            });
        }

        let flow_classifiers = self.fetch_classifiers(&chain.flow_classifiers).await?;

        Ok(ChainAggregate {
            id: chain.id,
            name: chain.name.clone(),
            tenant_id: chain.tenant_id.clone(),
            description: chain.description.clone(),
            groups,
            flow_classifiers,
        })
    }

    async fn fetch_classifiers(&self, ids: &[Uuid]) -> SfcResult<Vec<FlowClassifier>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let service = match &self.classifiers {
            Some(service) => service,
            None => {
                warn!("flow classifier service not available, assembling chain without classifiers");
                return Ok(Vec::new());
            }
        };

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            out.push(service.get_flow_classifier(*id).await?);
        }
        Ok(out)
    }
}
