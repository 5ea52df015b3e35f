//! Northbound control-plane database abstraction.
//!
//! The control plane is a transactional row store: rows are looked up
//! by indexed column, and mutations are queued as typed operations and
//! committed atomically. The SFC driver only ever talks to it through
//! [`NbApi`], so the real OVSDB connection and the in-memory test
//! store are interchangeable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SfcResult;

/// Control-plane table names.
pub mod tables {
    /// Logical switch table (owned by the core topology, read-only here)
    pub const LOGICAL_SWITCH: &str = "Logical_Switch";

    /// Logical switch port table (read-only here)
    pub const LOGICAL_SWITCH_PORT: &str = "Logical_Switch_Port";

    /// Port chain rows, one per switch a chain touches
    pub const LOGICAL_PORT_CHAIN: &str = "Logical_Port_Chain";

    /// Port pair group rows
    pub const LOGICAL_PORT_PAIR_GROUP: &str = "Logical_Port_Pair_Group";

    /// Port pair rows
    pub const LOGICAL_PORT_PAIR: &str = "Logical_Port_Pair";

    /// Flow classifier (steering rule) rows
    pub const LOGICAL_FLOW_CLASSIFIER: &str = "Logical_Flow_Classifier";
}

/// Column names on SFC-owned rows.
pub mod columns {
    /// The row name column, indexed on every table above
    pub const NAME: &str = "name";

    /// The owning-switch column on switch-scoped rows
    pub const SWITCH: &str = "switch";

    /// The owning-chain column on group and rule rows
    pub const CHAIN: &str = "chain";

    /// The member list column on group rows
    pub const PORT_PAIRS: &str = "port_pairs";

    /// Resolved ingress port column on pair rows
    pub const INPORT: &str = "inport";

    /// Resolved egress port column on pair rows
    pub const OUTPORT: &str = "outport";

    /// Match expression column on rule rows
    pub const MATCH: &str = "match";

    /// Action column on rule rows
    pub const ACTION: &str = "action";

    /// Priority column on rule rows
    pub const PRIORITY: &str = "priority";

    /// Direction column on rule rows
    pub const DIRECTION: &str = "direction";
}

/// A field-value pair on a control-plane row.
pub type FieldValue = (String, String);

/// Collection of field-value pairs for a row.
pub type FieldValues = Vec<FieldValue>;

/// A control-plane row as returned by indexed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Database-assigned row id
    pub uuid: Uuid,
    /// Row name (indexed)
    pub name: String,
    /// Remaining columns
    pub fields: FieldValues,
}

impl Row {
    /// Creates a row with a fresh uuid.
    pub fn new(name: impl Into<String>, fields: FieldValues) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            fields,
        }
    }

    /// Returns the value for a column, if present.
    pub fn get_field(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }
}

/// A typed row mutation queued into a [`Transaction`].
///
/// Create ops reference rows created earlier in the same transaction
/// by row name; the store resolves names to row ids at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NbOp {
    /// Create a chain row on a switch.
    CreatePortChain {
        /// Owning switch name
        switch: String,
        /// Chain row name
        chain: String,
    },

    /// Create a port pair row on a switch.
    CreatePortPair {
        /// Owning switch name
        switch: String,
        /// Pair row name
        name: String,
        /// Resolved ingress port row id
        inport: Uuid,
        /// Resolved egress port row id
        outport: Uuid,
    },

    /// Create a group row listing its member pair rows by name.
    CreatePortPairGroup {
        /// Group row name
        name: String,
        /// Owning chain row name
        chain: String,
        /// Member pair row names, resolved to row ids at commit
        port_pairs: Vec<String>,
    },

    /// Create a traffic-steering rule row on a switch.
    CreateSteeringRule {
        /// Owning switch name
        switch: String,
        /// Owning chain row name
        chain: String,
        /// Rule row name
        name: String,
        /// Match expression over resolved port row ids
        match_expr: String,
        /// Steering action
        action: String,
        /// Rule priority
        priority: i64,
        /// Rule direction
        direction: String,
        /// Remaining classifier match fields
        fields: FieldValues,
    },

    /// Replace a group row's member list.
    SetPortPairGroup {
        /// Group row name
        name: String,
        /// New member pair row ids
        port_pairs: Vec<Uuid>,
    },

    /// Delete a port pair row, scoped to its switch and owning group.
    DeletePortPair {
        /// Owning switch name
        switch: String,
        /// Owning group row name
        group: String,
        /// Pair row name
        name: String,
    },

    /// Delete a group row.
    DeletePortPairGroup {
        /// Group row name
        name: String,
    },

    /// Delete a steering rule row, scoped to its switch.
    DeleteSteeringRule {
        /// Owning switch name
        switch: String,
        /// Rule row name
        name: String,
    },

    /// Delete a chain row, scoped to its switch.
    DeletePortChain {
        /// Owning switch name
        switch: String,
        /// Chain row name
        chain: String,
    },
}

/// An ordered batch of row mutations committed as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    ops: Vec<NbOp>,
}

impl Transaction {
    /// Creates an empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an operation.
    pub fn add(&mut self, op: NbOp) {
        self.ops.push(op);
    }

    /// Returns the queued operations in order.
    pub fn ops(&self) -> &[NbOp] {
        &self.ops
    }

    /// Returns the number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if nothing has been queued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Northbound control-plane database handle.
///
/// Lookups are read-only and side-effect free; they never create rows.
/// `commit` is all-or-nothing: if any queued op's precondition fails,
/// the whole transaction aborts and the database is unchanged.
#[async_trait]
pub trait NbApi: Send + Sync {
    /// Indexed row lookup: first row in `table` whose `column` equals
    /// `value`, or `None`.
    async fn find_row(&self, table: &str, column: &str, value: &str) -> SfcResult<Option<Row>>;

    /// Applies every queued operation atomically.
    async fn commit(&self, txn: Transaction) -> SfcResult<()>;
}
