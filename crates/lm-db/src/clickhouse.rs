//! ClickHouse database backend implementation

use crate::error::{DbError, DbResult};
use crate::statements::split_statements;
use crate::traits::Database;
use async_trait::async_trait;
use clickhouse::error::Error as ChError;
use clickhouse::sql::Identifier;
use clickhouse::{Client, Compression, Row};
use lm_core::{ConnectionConfig, MigrationRecord};
use serde::{Deserialize, Serialize};

/// Row layout of the ledger table
#[derive(Debug, Row, Serialize, Deserialize)]
struct LedgerRow {
    name: String,
    /// `DateTime` column, seconds since epoch
    applied_at: u32,
}

impl From<&MigrationRecord> for LedgerRow {
    fn from(record: &MigrationRecord) -> Self {
        Self {
            name: record.name.clone(),
            applied_at: record.applied_at,
        }
    }
}

impl From<LedgerRow> for MigrationRecord {
    fn from(row: LedgerRow) -> Self {
        Self {
            name: row.name,
            applied_at: row.applied_at,
        }
    }
}

/// ClickHouse database backend
///
/// Talks to the server over its HTTP interface with LZ4 compression. A single
/// client is used for the whole invocation.
pub struct ClickHouseBackend {
    client: Client,
    async_insert: bool,
}

impl ClickHouseBackend {
    /// Build a client for `config` without contacting the server
    pub fn new(config: &ConnectionConfig) -> Self {
        let mut client = Client::default()
            .with_url(config.url())
            .with_database(&config.database)
            .with_compression(Compression::Lz4)
            .with_option("max_execution_time", config.max_execution_time.to_string());

        if let Some(user) = &config.username {
            client = client.with_user(user);
        }
        if let Some(password) = &config.password {
            client = client.with_password(password);
        }

        Self::from_client(client, config.async_insert)
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client, async_insert: bool) -> Self {
        Self {
            client,
            async_insert,
        }
    }

    /// Connect to the server described by `config`
    ///
    /// The server is pinged once so that an unreachable address or rejected
    /// credentials fail here rather than on the first migration. There is no
    /// retry.
    pub async fn connect(config: &ConnectionConfig) -> DbResult<Self> {
        let backend = Self::new(config);
        backend
            .client
            .query("SELECT 1")
            .execute()
            .await
            .map_err(|e| DbError::ConnectionError(format!("{e}: {config}")))?;
        log::debug!("Connected to {config}");
        Ok(backend)
    }

    /// Run an existence probe, mapping an empty result to `false`
    async fn fetch_exists(&self, query: clickhouse::query::Query) -> DbResult<bool> {
        match query.fetch_one::<u8>().await {
            Ok(_) => Ok(true),
            Err(ChError::RowNotFound) => Ok(false),
            Err(e) => Err(DbError::QueryError(e.to_string())),
        }
    }
}

/// Escape `?` so the driver does not treat it as a bind placeholder
fn escape_placeholders(sql: &str) -> String {
    sql.replace('?', "??")
}

/// Settings attached to ledger inserts
fn insert_settings(async_insert: bool) -> &'static [(&'static str, &'static str)] {
    if async_insert {
        &[("async_insert", "1"), ("wait_for_async_insert", "0")]
    } else {
        &[]
    }
}

#[async_trait]
impl Database for ClickHouseBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        // The HTTP interface accepts one statement per request
        let statements = split_statements(sql);
        if statements.is_empty() {
            return Err(DbError::ExecutionError(
                "migration contains no statements".to_string(),
            ));
        }
        for (index, statement) in statements.iter().enumerate() {
            log::debug!("Executing statement {} of {}", index + 1, statements.len());
            self.client
                .query(&escape_placeholders(statement))
                .execute()
                .await
                .map_err(|e| {
                    DbError::ExecutionError(format!(
                        "statement {} of {}: {}",
                        index + 1,
                        statements.len(),
                        e
                    ))
                })?;
        }
        Ok(())
    }

    async fn table_exists(&self, table: &str) -> DbResult<bool> {
        let query = self
            .client
            .query(
                "SELECT 1 FROM system.tables \
                 WHERE database = currentDatabase() AND name = ? LIMIT 1",
            )
            .bind(table);
        self.fetch_exists(query).await
    }

    async fn create_ledger_table(&self, table: &str) -> DbResult<()> {
        self.client
            .query(
                "CREATE TABLE IF NOT EXISTS ? (
                    name       String,
                    applied_at DateTime
                ) ENGINE = MergeTree() ORDER BY (name, applied_at)",
            )
            .bind(Identifier(table))
            .execute()
            .await
            .map_err(|e| DbError::ExecutionError(format!("failed to create {table}: {e}")))
    }

    async fn ledger_contains(&self, table: &str, name: &str) -> DbResult<bool> {
        let query = self
            .client
            .query("SELECT 1 FROM ? WHERE name = ? LIMIT 1")
            .bind(Identifier(table))
            .bind(name);
        self.fetch_exists(query).await
    }

    async fn ledger_append(&self, table: &str, record: &MigrationRecord) -> DbResult<()> {
        let client = insert_settings(self.async_insert)
            .iter()
            .fold(self.client.clone(), |client, (name, value)| {
                client.with_option(*name, *value)
            });

        let mut insert = client
            .insert::<LedgerRow>(table)
            .map_err(|e| DbError::InsertError(e.to_string()))?;
        insert
            .write(&LedgerRow::from(record))
            .await
            .map_err(|e| DbError::InsertError(e.to_string()))?;
        insert
            .end()
            .await
            .map_err(|e| DbError::InsertError(e.to_string()))
    }

    async fn ledger_records(&self, table: &str) -> DbResult<Vec<MigrationRecord>> {
        let rows = self
            .client
            .query("SELECT ?fields FROM ? ORDER BY name, applied_at")
            .bind(Identifier(table))
            .fetch_all::<LedgerRow>()
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(rows.into_iter().map(MigrationRecord::from).collect())
    }

    fn db_type(&self) -> &'static str {
        "clickhouse"
    }
}
