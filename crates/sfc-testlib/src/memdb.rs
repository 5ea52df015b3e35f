//! In-memory northbound database with atomic commit semantics.
//!
//! `MemoryNb` stands in for the real OVSDB connection in tests. Its
//! `commit` stages every queued op against a copy of the state and
//! only swaps the copy in when all preconditions held, so a failing
//! transaction leaves the database byte-for-byte unchanged.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use sfc_common::{
    columns, tables, NbApi, NbOp, Row, SfcError, SfcResult, Transaction,
};

#[derive(Debug, Default, Clone)]
struct NbState {
    tables: HashMap<String, Vec<Row>>,
}

impl NbState {
    fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn rows_mut(&mut self, table: &str) -> &mut Vec<Row> {
        self.tables.entry(table.to_string()).or_default()
    }

    fn find_by_name(&self, table: &str, name: &str) -> Option<&Row> {
        self.rows(table).iter().find(|r| r.name == name)
    }

    /// Position of a switch-scoped row (chain, pair, rule tables).
    fn find_scoped(&self, table: &str, name: &str, switch: &str) -> Option<usize> {
        self.rows(table)
            .iter()
            .position(|r| r.name == name && r.get_field(columns::SWITCH) == Some(switch))
    }

    fn require_switch(&self, switch: &str) -> Result<(), String> {
        if self.find_by_name(tables::LOGICAL_SWITCH, switch).is_none() {
            return Err(format!("logical switch '{}' does not exist", switch));
        }
        Ok(())
    }

    fn apply(&mut self, op: &NbOp) -> Result<(), String> {
        match op {
            NbOp::CreatePortChain { switch, chain } => {
                self.require_switch(switch)?;
                if self
                    .find_scoped(tables::LOGICAL_PORT_CHAIN, chain, switch)
                    .is_some()
                {
                    return Err(format!(
                        "chain row '{}' already exists on switch '{}'",
                        chain, switch
                    ));
                }
                self.rows_mut(tables::LOGICAL_PORT_CHAIN).push(Row::new(
                    chain.clone(),
                    vec![(columns::SWITCH.to_string(), switch.clone())],
                ));
                Ok(())
            }

            NbOp::CreatePortPair {
                switch,
                name,
                inport,
                outport,
            } => {
                self.require_switch(switch)?;
                if self.find_by_name(tables::LOGICAL_PORT_PAIR, name).is_some() {
                    return Err(format!("port pair row '{}' already exists", name));
                }
                self.rows_mut(tables::LOGICAL_PORT_PAIR).push(Row::new(
                    name.clone(),
                    vec![
                        (columns::SWITCH.to_string(), switch.clone()),
                        (columns::INPORT.to_string(), inport.to_string()),
                        (columns::OUTPORT.to_string(), outport.to_string()),
                    ],
                ));
                Ok(())
            }

            NbOp::CreatePortPairGroup {
                name,
                chain,
                port_pairs,
            } => {
                if self
                    .find_by_name(tables::LOGICAL_PORT_PAIR_GROUP, name)
                    .is_some()
                {
                    return Err(format!("port pair group row '{}' already exists", name));
                }
                // Member names resolve against rows created earlier in
                // the same transaction.
                let mut members = Vec::with_capacity(port_pairs.len());
                for pair_name in port_pairs {
                    let row = self
                        .find_by_name(tables::LOGICAL_PORT_PAIR, pair_name)
                        .ok_or_else(|| {
                            format!("port pair row '{}' does not exist", pair_name)
                        })?;
                    members.push(row.uuid.to_string());
                }
                self.rows_mut(tables::LOGICAL_PORT_PAIR_GROUP).push(Row::new(
                    name.clone(),
                    vec![
                        (columns::CHAIN.to_string(), chain.clone()),
                        (columns::PORT_PAIRS.to_string(), members.join(",")),
                    ],
                ));
                Ok(())
            }

            NbOp::CreateSteeringRule {
                switch,
                chain,
                name,
                match_expr,
                action,
                priority,
                direction,
                fields,
            } => {
                self.require_switch(switch)?;
                if self
                    .find_scoped(tables::LOGICAL_FLOW_CLASSIFIER, name, switch)
                    .is_some()
                {
                    return Err(format!(
                        "rule row '{}' already exists on switch '{}'",
                        name, switch
                    ));
                }
                let mut fvs = vec![
                    (columns::SWITCH.to_string(), switch.clone()),
                    (columns::CHAIN.to_string(), chain.clone()),
                    (columns::MATCH.to_string(), match_expr.clone()),
                    (columns::ACTION.to_string(), action.clone()),
                    (columns::PRIORITY.to_string(), priority.to_string()),
                    (columns::DIRECTION.to_string(), direction.clone()),
                ];
                fvs.extend(fields.iter().cloned());
                self.rows_mut(tables::LOGICAL_FLOW_CLASSIFIER)
                    .push(Row::new(name.clone(), fvs));
                Ok(())
            }

            NbOp::SetPortPairGroup { name, port_pairs } => {
                let members = port_pairs
                    .iter()
                    .map(Uuid::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                let row = self
                    .rows_mut(tables::LOGICAL_PORT_PAIR_GROUP)
                    .iter_mut()
                    .find(|r| r.name == *name)
                    .ok_or_else(|| format!("port pair group row '{}' does not exist", name))?;
                set_field(row, columns::PORT_PAIRS, members);
                Ok(())
            }

            NbOp::DeletePortPair {
                switch,
                group,
                name,
            } => {
                let idx = self
                    .find_scoped(tables::LOGICAL_PORT_PAIR, name, switch)
                    .ok_or_else(|| {
                        format!("port pair row '{}' does not exist on switch '{}'", name, switch)
                    })?;
                let removed = self.rows_mut(tables::LOGICAL_PORT_PAIR).remove(idx);

                // Unlink from the owning group when its row is still present.
                let removed_uuid = removed.uuid.to_string();
                if let Some(group_row) = self
                    .rows_mut(tables::LOGICAL_PORT_PAIR_GROUP)
                    .iter_mut()
                    .find(|r| r.name == *group)
                {
                    if let Some(current) = group_row.get_field(columns::PORT_PAIRS) {
                        let remaining = current
                            .split(',')
                            .filter(|m| !m.is_empty() && *m != removed_uuid)
                            .collect::<Vec<_>>()
                            .join(",");
                        set_field(group_row, columns::PORT_PAIRS, remaining);
                    }
                }
                Ok(())
            }

            NbOp::DeletePortPairGroup { name } => {
                let rows = self.rows_mut(tables::LOGICAL_PORT_PAIR_GROUP);
                let idx = rows
                    .iter()
                    .position(|r| r.name == *name)
                    .ok_or_else(|| format!("port pair group row '{}' does not exist", name))?;
                rows.remove(idx);
                Ok(())
            }

            NbOp::DeleteSteeringRule { switch, name } => {
                let idx = self
                    .find_scoped(tables::LOGICAL_FLOW_CLASSIFIER, name, switch)
                    .ok_or_else(|| {
                        format!("rule row '{}' does not exist on switch '{}'", name, switch)
                    })?;
                self.rows_mut(tables::LOGICAL_FLOW_CLASSIFIER).remove(idx);
                Ok(())
            }

            NbOp::DeletePortChain { switch, chain } => {
                let idx = self
                    .find_scoped(tables::LOGICAL_PORT_CHAIN, chain, switch)
                    .ok_or_else(|| {
                        format!("chain row '{}' does not exist on switch '{}'", chain, switch)
                    })?;
                self.rows_mut(tables::LOGICAL_PORT_CHAIN).remove(idx);
                Ok(())
            }
        }
    }
}

fn set_field(row: &mut Row, field: &str, value: String) {
    match row.fields.iter_mut().find(|(f, _)| f == field) {
        Some((_, v)) => *v = value,
        None => row.fields.push((field.to_string(), value)),
    }
}

/// In-memory [`NbApi`] implementation.
#[derive(Debug, Default)]
pub struct MemoryNb {
    state: Mutex<NbState>,
}

impl MemoryNb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a logical switch row.
    pub fn add_switch(&self, name: &str) -> Uuid {
        self.add_row(tables::LOGICAL_SWITCH, name, Vec::new())
    }

    /// Seeds a logical switch port row, named by the port's id.
    pub fn add_port(&self, port_id: Uuid) -> Uuid {
        self.add_row(tables::LOGICAL_SWITCH_PORT, &port_id.to_string(), Vec::new())
    }

    /// Seeds an arbitrary row; returns its assigned row id.
    pub fn add_row(
        &self,
        table: &str,
        name: &str,
        fields: Vec<(String, String)>,
    ) -> Uuid {
        let row = Row::new(name, fields);
        let uuid = row.uuid;
        self.lock().rows_mut(table).push(row);
        uuid
    }

    /// Returns the number of rows in a table.
    pub fn row_count(&self, table: &str) -> usize {
        self.lock().rows(table).len()
    }

    /// Returns the sorted row names of a table.
    pub fn row_names(&self, table: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .lock()
            .rows(table)
            .iter()
            .map(|r| r.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Returns a row by name, if present.
    pub fn get_row(&self, table: &str, name: &str) -> Option<Row> {
        self.lock().find_by_name(table, name).cloned()
    }

    /// Returns the sorted row names of every non-empty table,
    /// comparable across commits for round-trip assertions.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<String>> {
        let state = self.lock();
        let mut out = BTreeMap::new();
        for (table, rows) in &state.tables {
            if rows.is_empty() {
                continue;
            }
            let mut names: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();
            names.sort();
            out.insert(table.clone(), names);
        }
        out
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NbState> {
        self.state.lock().expect("nb state lock poisoned")
    }
}

#[async_trait]
impl NbApi for MemoryNb {
    async fn find_row(&self, table: &str, column: &str, value: &str) -> SfcResult<Option<Row>> {
        let state = self.lock();
        let row = state.rows(table).iter().find(|r| {
            if column == columns::NAME {
                r.name == value
            } else {
                r.get_field(column) == Some(value)
            }
        });
        Ok(row.cloned())
    }

    async fn commit(&self, txn: Transaction) -> SfcResult<()> {
        let mut state = self.lock();
        let mut staged = state.clone();
        for op in txn.ops() {
            staged
                .apply(op)
                .map_err(|message| SfcError::commit(message))?;
        }
        *state = staged;
        Ok(())
    }
}
