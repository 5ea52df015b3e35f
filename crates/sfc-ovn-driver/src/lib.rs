//! sfc-ovn-driver - OVN driver for service function chaining
//!
//! Translates the declarative SFC intent model (port chains, port pair
//! groups, port pairs, flow classifiers) into atomic transactions
//! against the OVN-style northbound database. Each lifecycle event is
//! resolved, queued, and committed as a single all-or-nothing
//! transaction.

mod assembler;
mod builder;
mod driver;
mod names;
mod tables;
mod topology;

pub use assembler::ChainAssembler;
pub use builder::TransactionBuilder;
pub use driver::{ApplyStatus, SfcDriver};
pub use names::{sfc_row_name, sfc_uuid, switch_name, SFC_NAME_PREFIX};
pub use tables::{steering_match, RULE_ACTION, RULE_DIRECTION, RULE_PRIORITY};
pub use topology::TopologyResolver;
