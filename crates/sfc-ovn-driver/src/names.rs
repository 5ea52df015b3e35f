//! Deterministic mapping from intent-model ids to northbound row names.

use uuid::Uuid;

/// Prefix for every SFC-owned northbound row name.
pub const SFC_NAME_PREFIX: &str = "neutron-sfc";

/// Prefix for logical switch names derived from network ids.
pub const SWITCH_NAME_PREFIX: &str = "neutron";

/// Maps an intent-model id to its northbound row name.
///
/// The control plane pattern-matches bare-UUID names as "no name", so
/// a non-UUID-shaped prefix is prepended. The mapping is bijective:
/// every SFC row can be found again from the owning intent-model id
/// alone, with no auxiliary state.
pub fn sfc_row_name(id: Uuid) -> String {
    format!("{}-{}", SFC_NAME_PREFIX, id)
}

/// Recovers the intent-model id from an SFC row name.
pub fn sfc_uuid(name: &str) -> Option<Uuid> {
    let suffix = name.strip_prefix(SFC_NAME_PREFIX)?.strip_prefix('-')?;
    Uuid::parse_str(suffix).ok()
}

/// Maps a network id to the name of its logical switch row.
pub fn switch_name(network_id: Uuid) -> String {
    format!("{}-{}", SWITCH_NAME_PREFIX, network_id)
}
