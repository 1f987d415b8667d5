//! In-memory `Database` used by the ledger and runner tests.
//!
//! Every trait call is logged so tests can assert on ordering and on what was
//! never attempted.

use async_trait::async_trait;
use lm_core::MigrationRecord;
use lm_db::{Database, DbError, DbResult};
use std::sync::Mutex;

/// One observed call against the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    TableExists,
    CreateLedgerTable,
    LedgerContains(String),
    LedgerAppend(String),
    LedgerRecords,
    Execute(String),
}

#[derive(Default)]
struct State {
    ledger_table: bool,
    records: Vec<MigrationRecord>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub(crate) struct MemoryDatabase {
    state: Mutex<State>,
    /// Scripts containing any of these fragments fail to execute
    fail_statements: Vec<String>,
    /// Appends for these names fail
    fail_appends: Vec<String>,
    /// Every ledger lookup fails with a non "no rows" error
    fail_lookups: bool,
    /// Creating the ledger table fails
    fail_create: bool,
}

impl MemoryDatabase {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fake with an existing ledger already holding `names`
    pub(crate) fn with_applied(names: &[&str]) -> Self {
        let db = Self::new();
        {
            let mut state = db.state.lock().unwrap();
            state.ledger_table = true;
            state.records = names
                .iter()
                .map(|name| MigrationRecord {
                    name: name.to_string(),
                    applied_at: 1_700_000_000,
                })
                .collect();
        }
        db
    }

    pub(crate) fn failing_statement(mut self, fragment: &str) -> Self {
        self.fail_statements.push(fragment.to_string());
        self
    }

    pub(crate) fn failing_append(mut self, name: &str) -> Self {
        self.fail_appends.push(name.to_string());
        self
    }

    pub(crate) fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub(crate) fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn executed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Execute(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn recorded(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    pub(crate) fn has_ledger_table(&self) -> bool {
        self.state.lock().unwrap().ledger_table
    }

    fn log(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn require_table(&self, table: &str) -> DbResult<()> {
        if self.state.lock().unwrap().ledger_table {
            Ok(())
        } else {
            Err(DbError::QueryError(format!(
                "Table default.{table} doesn't exist"
            )))
        }
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.log(Call::Execute(sql.to_string()));
        if self.fail_statements.iter().any(|f| sql.contains(f.as_str())) {
            return Err(DbError::ExecutionError(format!("Syntax error: {sql}")));
        }
        Ok(())
    }

    async fn table_exists(&self, _table: &str) -> DbResult<bool> {
        self.log(Call::TableExists);
        Ok(self.state.lock().unwrap().ledger_table)
    }

    async fn create_ledger_table(&self, _table: &str) -> DbResult<()> {
        self.log(Call::CreateLedgerTable);
        if self.fail_create {
            return Err(DbError::ExecutionError(
                "Not enough privileges to CREATE TABLE".to_string(),
            ));
        }
        self.state.lock().unwrap().ledger_table = true;
        Ok(())
    }

    async fn ledger_contains(&self, table: &str, name: &str) -> DbResult<bool> {
        self.log(Call::LedgerContains(name.to_string()));
        if self.fail_lookups {
            return Err(DbError::QueryError("Timeout exceeded".to_string()));
        }
        self.require_table(table)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .records
            .iter()
            .any(|r| r.name == name))
    }

    async fn ledger_append(&self, table: &str, record: &MigrationRecord) -> DbResult<()> {
        self.log(Call::LedgerAppend(record.name.clone()));
        if self.fail_appends.contains(&record.name) {
            return Err(DbError::InsertError("Connection reset by peer".to_string()));
        }
        self.require_table(table)?;
        self.state.lock().unwrap().records.push(record.clone());
        Ok(())
    }

    async fn ledger_records(&self, table: &str) -> DbResult<Vec<MigrationRecord>> {
        self.log(Call::LedgerRecords);
        self.require_table(table)?;
        let mut records = self.state.lock().unwrap().records.clone();
        records.sort_by(|a, b| (&a.name, a.applied_at).cmp(&(&b.name, b.applied_at)));
        Ok(records)
    }

    fn db_type(&self) -> &'static str {
        "memory"
    }
}
