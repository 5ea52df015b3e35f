//! End-to-end chain lifecycle tests against the in-memory northbound
//! database.

use std::sync::Arc;

use uuid::Uuid;

use sfc_common::{columns, tables, SfcError};
use sfc_ovn_driver::{sfc_row_name, sfc_uuid, steering_match, switch_name, ApplyStatus, SfcDriver};
use sfc_testlib::{self as fixtures, MemoryClassifiers, MemoryModel, MemoryNb, MemoryTopology};
use sfc_types::{FlowClassifier, PortChain, PortPair, PortPairGroup};

/// One group, one pair (ingress P1, egress P2 on the same switch), one
/// classifier from P1 to P2 — the Scenario A shape.
struct Scenario {
    nb: Arc<MemoryNb>,
    topology: Arc<MemoryTopology>,
    model: Arc<MemoryModel>,
    classifiers: Arc<MemoryClassifiers>,
    chain: PortChain,
    group: PortPairGroup,
    pair: PortPair,
    fc: FlowClassifier,
    network: Uuid,
    p1_row: Uuid,
    p2_row: Uuid,
}

impl Scenario {
    fn new() -> Self {
        let nb = Arc::new(MemoryNb::new());
        let topology = Arc::new(MemoryTopology::new());
        let model = Arc::new(MemoryModel::new());
        let classifiers = Arc::new(MemoryClassifiers::new());

        let network = Uuid::new_v4();
        nb.add_switch(&switch_name(network));

        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        let p1_row = nb.add_port(p1);
        let p2_row = nb.add_port(p2);
        topology.add_port(p1, network);
        topology.add_port(p2, network);

        let pair = fixtures::port_pair(p1, p2);
        let group = fixtures::group_of(&[pair]);
        model.add_port_pair(pair);
        model.add_group(group.clone());

        let fc = fixtures::tcp_classifier(p1, p2);
        classifiers.add(fc.clone());

        let chain = fixtures::chain(std::slice::from_ref(&group), std::slice::from_ref(&fc));

        Self {
            nb,
            topology,
            model,
            classifiers,
            chain,
            group,
            pair,
            fc,
            network,
            p1_row,
            p2_row,
        }
    }

    fn driver(&self) -> SfcDriver {
        SfcDriver::new(
            self.nb.clone(),
            self.topology.clone(),
            self.model.clone(),
            Some(self.classifiers.clone()),
        )
    }

    fn driver_without_classifier_service(&self) -> SfcDriver {
        SfcDriver::new(
            self.nb.clone(),
            self.topology.clone(),
            self.model.clone(),
            None,
        )
    }
}

#[tokio::test]
async fn scenario_a_create_installs_expected_rows() {
    let s = Scenario::new();
    let status = s.driver().create_port_chain(&s.chain).await.unwrap();
    assert_eq!(status, ApplyStatus::Applied);

    let chain_name = sfc_row_name(s.chain.id);
    let switch = switch_name(s.network);

    // One switch-scoped chain row.
    assert_eq!(
        s.nb.row_names(tables::LOGICAL_PORT_CHAIN),
        vec![chain_name.clone()]
    );
    let chain_row = s.nb.get_row(tables::LOGICAL_PORT_CHAIN, &chain_name).unwrap();
    assert_eq!(chain_row.get_field(columns::SWITCH), Some(switch.as_str()));

    // One pair row with both ports resolved.
    let pair_row = s
        .nb
        .get_row(tables::LOGICAL_PORT_PAIR, &sfc_row_name(s.pair.id))
        .unwrap();
    assert_eq!(
        pair_row.get_field(columns::INPORT),
        Some(s.p1_row.to_string().as_str())
    );
    assert_eq!(
        pair_row.get_field(columns::OUTPORT),
        Some(s.p2_row.to_string().as_str())
    );

    // One group row referencing exactly that pair row.
    let group_row = s
        .nb
        .get_row(tables::LOGICAL_PORT_PAIR_GROUP, &sfc_row_name(s.group.id))
        .unwrap();
    assert_eq!(group_row.get_field(columns::CHAIN), Some(chain_name.as_str()));
    assert_eq!(
        group_row.get_field(columns::PORT_PAIRS),
        Some(pair_row.uuid.to_string().as_str())
    );

    // One steering rule over the resolved port row ids.
    let rule_row = s
        .nb
        .get_row(tables::LOGICAL_FLOW_CLASSIFIER, &sfc_row_name(s.fc.id))
        .unwrap();
    assert_eq!(
        rule_row.get_field(columns::MATCH),
        Some(steering_match(s.p1_row, s.p2_row).as_str())
    );
    assert_eq!(rule_row.get_field(columns::ACTION), Some("sfc"));
    assert_eq!(rule_row.get_field(columns::PRIORITY), Some("2000"));
    assert_eq!(rule_row.get_field(columns::DIRECTION), Some("from-lport"));
}

#[tokio::test]
async fn scenario_b_missing_switch_leaves_empty_diff() {
    let s = Scenario::new();

    // Classifier whose source port sits on a network with no switch row.
    let orphan_port = Uuid::new_v4();
    s.nb.add_port(orphan_port);
    s.topology.add_port(orphan_port, Uuid::new_v4());
    let fc = fixtures::classifier(orphan_port, s.pair.egress);
    s.classifiers.add(fc.clone());
    let chain = fixtures::chain(std::slice::from_ref(&s.group), &[fc]);

    let before = s.nb.snapshot();
    let err = s.driver().create_port_chain(&chain).await.unwrap_err();

    assert!(matches!(err, SfcError::ReferenceNotFound { .. }));
    assert_eq!(s.nb.snapshot(), before);
}

#[tokio::test]
async fn scenario_c_missing_egress_port_aborts_earlier_groups_too() {
    let s = Scenario::new();

    // Second group whose pair egresses into a port with no row.
    let ingress = Uuid::new_v4();
    let missing_egress = Uuid::new_v4();
    s.nb.add_port(ingress);
    s.topology.add_port(ingress, s.network);
    s.topology.add_port(missing_egress, s.network);
    let broken_pair = fixtures::port_pair(ingress, missing_egress);
    let broken_group = fixtures::group_of(&[broken_pair]);
    s.model.add_port_pair(broken_pair);
    s.model.add_group(broken_group.clone());

    let chain = fixtures::chain(&[s.group.clone(), broken_group], &[]);

    let before = s.nb.snapshot();
    let err = s.driver().create_port_chain(&chain).await.unwrap_err();

    assert!(matches!(err, SfcError::ReferenceNotFound { .. }));
    // Nothing from the healthy first group was committed either.
    assert_eq!(s.nb.snapshot(), before);
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_PAIR), 0);
}

#[tokio::test]
async fn scenario_d_delete_round_trips_the_row_set() {
    let s = Scenario::new();
    let before = s.nb.snapshot();
    let driver = s.driver();

    driver.create_port_chain(&s.chain).await.unwrap();
    assert_ne!(s.nb.snapshot(), before);

    let status = driver.delete_port_chain(&s.chain).await.unwrap();
    assert_eq!(status, ApplyStatus::Applied);
    assert_eq!(s.nb.snapshot(), before);
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_CHAIN), 0);
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_PAIR), 0);
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_PAIR_GROUP), 0);
    assert_eq!(s.nb.row_count(tables::LOGICAL_FLOW_CLASSIFIER), 0);
}

#[tokio::test]
async fn scenario_e_absent_classifier_service_builds_without_rules() {
    let s = Scenario::new();
    let driver = s.driver_without_classifier_service();

    let status = driver.create_port_chain(&s.chain).await.unwrap();
    assert_eq!(status, ApplyStatus::Applied);

    assert_eq!(s.nb.row_count(tables::LOGICAL_FLOW_CLASSIFIER), 0);
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_CHAIN), 1);
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_PAIR_GROUP), 1);
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_PAIR), 1);
}

#[tokio::test]
async fn emitted_rule_never_carries_intent_only_fields() {
    let s = Scenario::new();
    s.driver().create_port_chain(&s.chain).await.unwrap();

    let rule_row = s
        .nb
        .get_row(tables::LOGICAL_FLOW_CLASSIFIER, &sfc_row_name(s.fc.id))
        .unwrap();

    for stripped in ["id", "description", "l7_parameters", "tenant_id", "url_filter"] {
        assert_eq!(rule_row.get_field(stripped), None, "field '{}'", stripped);
    }
    // The fixture classifier has a display name; only the row name
    // (derived from the id) may appear, never the intent-model name.
    assert_ne!(rule_row.name, s.fc.name);

    // Match fields survive the projection.
    assert_eq!(rule_row.get_field("protocol"), Some("tcp"));
    assert_eq!(rule_row.get_field("destination_port_range_min"), Some("80"));
}

#[tokio::test]
async fn row_names_reverse_to_owning_intent_ids() {
    let s = Scenario::new();
    s.driver().create_port_chain(&s.chain).await.unwrap();

    let chain_row_name = &s.nb.row_names(tables::LOGICAL_PORT_CHAIN)[0];
    assert_eq!(sfc_uuid(chain_row_name), Some(s.chain.id));

    let pair_row_name = &s.nb.row_names(tables::LOGICAL_PORT_PAIR)[0];
    assert_eq!(sfc_uuid(pair_row_name), Some(s.pair.id));

    let group_row_name = &s.nb.row_names(tables::LOGICAL_PORT_PAIR_GROUP)[0];
    assert_eq!(sfc_uuid(group_row_name), Some(s.group.id));
}

#[tokio::test]
async fn duplicate_create_fails_at_commit_without_side_effects() {
    let s = Scenario::new();
    let driver = s.driver();

    driver.create_port_chain(&s.chain).await.unwrap();
    let after_first = s.nb.snapshot();

    let err = driver.create_port_chain(&s.chain).await.unwrap_err();
    assert!(matches!(err, SfcError::CommitFailure { .. }));
    assert_eq!(s.nb.snapshot(), after_first);
}

#[tokio::test]
async fn unsupported_lifecycle_ops_report_unsupported_and_change_nothing() {
    let s = Scenario::new();
    let driver = s.driver();
    let before = s.nb.snapshot();

    assert_eq!(
        driver.update_port_chain(&s.chain).await.unwrap(),
        ApplyStatus::Unsupported
    );
    assert_eq!(
        driver.create_port_pair_group(&s.group).await.unwrap(),
        ApplyStatus::Unsupported
    );
    assert_eq!(
        driver.update_port_pair_group(&s.group).await.unwrap(),
        ApplyStatus::Unsupported
    );
    assert_eq!(
        driver.delete_port_pair_group(&s.group).await.unwrap(),
        ApplyStatus::Unsupported
    );
    assert_eq!(
        driver.create_port_pair(s.pair.id).await.unwrap(),
        ApplyStatus::Unsupported
    );
    assert_eq!(
        driver.update_port_pair(s.pair.id).await.unwrap(),
        ApplyStatus::Unsupported
    );
    assert_eq!(
        driver.delete_port_pair(s.pair.id).await.unwrap(),
        ApplyStatus::Unsupported
    );

    assert_eq!(s.nb.snapshot(), before);
}

#[tokio::test]
async fn set_port_pair_group_rewrites_member_list() {
    let s = Scenario::new();
    let driver = s.driver();
    driver.create_port_chain(&s.chain).await.unwrap();

    let status = driver.set_port_pair_group(&s.group).await.unwrap();
    assert_eq!(status, ApplyStatus::Applied);

    let pair_row = s
        .nb
        .get_row(tables::LOGICAL_PORT_PAIR, &sfc_row_name(s.pair.id))
        .unwrap();
    let group_row = s
        .nb
        .get_row(tables::LOGICAL_PORT_PAIR_GROUP, &sfc_row_name(s.group.id))
        .unwrap();
    assert_eq!(
        group_row.get_field(columns::PORT_PAIRS),
        Some(pair_row.uuid.to_string().as_str())
    );
}

#[tokio::test]
async fn set_port_pair_group_fails_when_pair_row_missing() {
    let s = Scenario::new();
    let driver = s.driver();

    // No create ran, so no pair rows exist yet.
    let err = driver.set_port_pair_group(&s.group).await.unwrap_err();
    assert!(matches!(err, SfcError::ReferenceNotFound { .. }));
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_PAIR_GROUP), 0);
}

#[tokio::test]
async fn delete_with_unresolvable_switch_aborts_whole_delete() {
    let s = Scenario::new();
    let driver = s.driver();
    driver.create_port_chain(&s.chain).await.unwrap();
    let installed = s.nb.snapshot();

    // A second chain whose pair ingress vanished from the topology.
    let ghost_ingress = Uuid::new_v4();
    let ghost_pair = fixtures::port_pair(ghost_ingress, s.pair.egress);
    let ghost_group = fixtures::group_of(&[ghost_pair]);
    s.model.add_port_pair(ghost_pair);
    s.model.add_group(ghost_group.clone());
    let ghost_chain = fixtures::chain(&[ghost_group], &[]);

    let err = driver.delete_port_chain(&ghost_chain).await.unwrap_err();
    assert!(matches!(err, SfcError::ReferenceNotFound { .. }));
    // The installed chain's rows were not touched.
    assert_eq!(s.nb.snapshot(), installed);
}

#[tokio::test]
async fn chain_spanning_two_switches_gets_one_chain_row_per_switch() {
    let s = Scenario::new();

    // Second service function on another network/switch.
    let network2 = Uuid::new_v4();
    s.nb.add_switch(&switch_name(network2));
    let p3 = Uuid::new_v4();
    let p4 = Uuid::new_v4();
    s.nb.add_port(p3);
    s.nb.add_port(p4);
    s.topology.add_port(p3, network2);
    s.topology.add_port(p4, network2);
    let pair2 = fixtures::port_pair(p3, p4);
    let group2 = fixtures::group_of(&[pair2]);
    s.model.add_port_pair(pair2);
    s.model.add_group(group2.clone());

    let chain = fixtures::chain(&[s.group.clone(), group2], &[s.fc.clone()]);
    let driver = s.driver();
    driver.create_port_chain(&chain).await.unwrap();

    let chain_name = sfc_row_name(chain.id);
    assert_eq!(
        s.nb.row_names(tables::LOGICAL_PORT_CHAIN),
        vec![chain_name.clone(), chain_name]
    );
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_PAIR), 2);
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_PAIR_GROUP), 2);

    // And the teardown is symmetric across both switches.
    driver.delete_port_chain(&chain).await.unwrap();
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_CHAIN), 0);
    assert_eq!(s.nb.row_count(tables::LOGICAL_PORT_PAIR), 0);
}
