//! Transaction building: one atomic batch of row mutations per
//! lifecycle event.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use sfc_common::{NbApi, NbOp, RefKind, SfcError, SfcResult, Transaction};
use sfc_types::{ChainAggregate, PortPairGroup};

use crate::names::sfc_row_name;
use crate::tables::{steering_match, RULE_ACTION, RULE_DIRECTION, RULE_PRIORITY};
use crate::topology::TopologyResolver;

/// Builds and commits northbound transactions for chain lifecycle
/// events.
///
/// All resolution happens before the single commit at the end of each
/// call; any unresolved reference aborts the whole call with nothing
/// applied, so the control plane never observes a partial chain.
pub struct TransactionBuilder {
    nb: Arc<dyn NbApi>,
    resolver: TopologyResolver,
}

impl TransactionBuilder {
    /// Creates a builder over the given northbound handle and resolver.
    pub fn new(nb: Arc<dyn NbApi>, resolver: TopologyResolver) -> Self {
        Self { nb, resolver }
    }

    /// Realizes a chain: steering rules, port pair rows, group rows,
    /// and switch-scoped chain rows, committed as one transaction.
    pub async fn build_create(&self, aggregate: &ChainAggregate) -> SfcResult<()> {
        let chain_name = sfc_row_name(aggregate.id);
        let mut txn = Transaction::new();
        // Switches the chain touches, in first-reference order.
        let mut switches: Vec<String> = Vec::new();

        for fc in &aggregate.flow_classifiers {
            let switch = self.require_switch(fc.logical_source_port).await?;
            let inport = self.require_port(fc.logical_source_port).await?;
            let outport = self.require_port(fc.logical_destination_port).await?;

            txn.add(NbOp::CreateSteeringRule {
                switch: switch.clone(),
                chain: chain_name.clone(),
                name: sfc_row_name(fc.id),
                match_expr: steering_match(inport, outport),
                action: RULE_ACTION.to_string(),
                priority: RULE_PRIORITY,
                direction: RULE_DIRECTION.to_string(),
                fields: fc.match_fields(),
            });
            push_unique(&mut switches, switch);
        }

        for group in &aggregate.groups {
            let mut pair_names = Vec::with_capacity(group.port_pairs.len());
            for pair in &group.port_pairs {
                let switch = self.require_switch(pair.ingress).await?;
                let inport = self.require_port(pair.ingress).await?;
                let outport = self.require_port(pair.egress).await?;

                let name = sfc_row_name(pair.id);
                txn.add(NbOp::CreatePortPair {
                    switch: switch.clone(),
                    name: name.clone(),
                    inport,
                    outport,
                });
                pair_names.push(name);
                push_unique(&mut switches, switch);
            }

            txn.add(NbOp::CreatePortPairGroup {
                name: sfc_row_name(group.id),
                chain: chain_name.clone(),
                port_pairs: pair_names,
            });
        }

        for switch in switches {
            txn.add(NbOp::CreatePortChain {
                switch,
                chain: chain_name.clone(),
            });
        }

        debug!(chain = %chain_name, ops = txn.len(), "committing chain create");
        self.nb.commit(txn).await?;
        info!(chain = %chain_name, "port chain installed");
        Ok(())
    }

    /// Tears a chain down, reversing every row [`build_create`] emits,
    /// in one transaction.
    pub async fn build_delete(&self, aggregate: &ChainAggregate) -> SfcResult<()> {
        let chain_name = sfc_row_name(aggregate.id);
        let mut txn = Transaction::new();
        let mut switches: Vec<String> = Vec::new();

        for group in &aggregate.groups {
            let group_name = sfc_row_name(group.id);
            for pair in &group.port_pairs {
                let switch = self.require_switch(pair.ingress).await?;
                txn.add(NbOp::DeletePortPair {
                    switch: switch.clone(),
                    group: group_name.clone(),
                    name: sfc_row_name(pair.id),
                });
                push_unique(&mut switches, switch);
            }
            txn.add(NbOp::DeletePortPairGroup { name: group_name });
        }

        for fc in &aggregate.flow_classifiers {
            let switch = self.require_switch(fc.logical_source_port).await?;
            txn.add(NbOp::DeleteSteeringRule {
                switch: switch.clone(),
                name: sfc_row_name(fc.id),
            });
            push_unique(&mut switches, switch);
        }

        for switch in switches {
            txn.add(NbOp::DeletePortChain {
                switch,
                chain: chain_name.clone(),
            });
        }

        debug!(chain = %chain_name, ops = txn.len(), "committing chain delete");
        self.nb.commit(txn).await?;
        info!(chain = %chain_name, "port chain removed");
        Ok(())
    }

    /// Re-sets a group row's member list from the intent model.
    ///
    /// Every member pair row must already exist; a missing pair aborts
    /// the whole call.
    pub async fn set_port_pair_group(&self, group: &PortPairGroup) -> SfcResult<()> {
        let group_name = sfc_row_name(group.id);
        let mut members = Vec::with_capacity(group.port_pairs.len());

        for pair_id in &group.port_pairs {
            let pair_name = sfc_row_name(*pair_id);
            let uuid = self
                .resolver
                .resolve_port_pair(&pair_name)
                .await?
                .ok_or_else(|| {
                    error!(%pair_id, "port pair row missing while re-setting group");
                    SfcError::reference_not_found(RefKind::LogicalPortPair, pair_id)
                })?;
            members.push(uuid);
        }

        let mut txn = Transaction::new();
        txn.add(NbOp::SetPortPairGroup {
            name: group_name.clone(),
            port_pairs: members,
        });
        self.nb.commit(txn).await?;
        info!(group = %group_name, "port pair group members re-set");
        Ok(())
    }

    async fn require_switch(&self, port_id: Uuid) -> SfcResult<String> {
        self.resolver
            .resolve_switch(port_id)
            .await?
            .ok_or_else(|| {
                error!(%port_id, "no logical switch for referenced port");
                SfcError::reference_not_found(RefKind::LogicalSwitch, port_id)
            })
    }

    async fn require_port(&self, port_id: Uuid) -> SfcResult<Uuid> {
        self.resolver.resolve_port(port_id).await?.ok_or_else(|| {
            error!(%port_id, "referenced logical port does not exist");
            SfcError::reference_not_found(RefKind::LogicalPort, port_id)
        })
    }
}

fn push_unique(switches: &mut Vec<String>, switch: String) {
    if !switches.contains(&switch) {
        switches.push(switch);
    }
}
