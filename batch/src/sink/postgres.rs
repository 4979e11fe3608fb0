use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use sqlx::Transaction;
use tracing::{debug, warn};

use batch_config::shared::{InsertSinkConfig, PgConnectionConfig};

use crate::error::BatchResult;
use crate::sink::{RecordSink, SinkTransaction};
use crate::types::{Cell, Record};

/// A [`RecordSink`] inserting records into a Postgres table.
///
/// Each chunk runs inside one database transaction; every record becomes one
/// parameterized `INSERT` against the configured table and columns. Record
/// cells bind positionally, so the step configuration must pair each source
/// field with a target column.
#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
    statement: Arc<String>,
}

impl PostgresSink {
    /// Connects to Postgres and prepares the insert statement.
    ///
    /// `max_connections` bounds the pool and should cover the number of chunk
    /// transactions allowed in flight at once. Connectivity is verified
    /// eagerly so a misconfigured sink fails at startup rather than on the
    /// first chunk.
    pub async fn connect(
        connection: &PgConnectionConfig,
        sink: &InsertSinkConfig,
        max_connections: u32,
    ) -> BatchResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy_with(connection.with_db());

        sqlx::query("select 1").execute(&pool).await?;

        let statement = build_insert_statement(sink);
        debug!(table = %sink.table, statement = %statement, "postgres sink connected");

        Ok(Self {
            pool,
            statement: Arc::new(statement),
        })
    }
}

impl RecordSink for PostgresSink {
    type Transaction = PostgresSinkTransaction;

    async fn begin(&self) -> BatchResult<Self::Transaction> {
        let transaction = self.pool.begin().await?;

        Ok(PostgresSinkTransaction {
            transaction,
            statement: self.statement.clone(),
        })
    }
}

/// A database transaction writing one chunk of records.
pub struct PostgresSinkTransaction {
    transaction: Transaction<'static, Postgres>,
    statement: Arc<String>,
}

impl SinkTransaction for PostgresSinkTransaction {
    async fn write(&mut self, records: &[Record]) -> BatchResult<()> {
        let statement = self.statement.clone();

        for record in records {
            let mut query = sqlx::query(statement.as_str());

            for value in &record.values {
                query = match value {
                    Cell::Null => query.bind(Option::<String>::None),
                    Cell::String(value) => query.bind(value),
                    Cell::I64(value) => query.bind(*value),
                    Cell::F64(value) => query.bind(*value),
                    Cell::Timestamp(value) => query.bind(*value),
                };
            }

            query.execute(&mut *self.transaction).await?;
        }

        Ok(())
    }

    async fn commit(self) -> BatchResult<()> {
        self.transaction.commit().await?;

        Ok(())
    }

    async fn rollback(self) -> BatchResult<()> {
        if let Err(err) = self.transaction.rollback().await {
            warn!(error = %err, "failed to roll back sink transaction");
        }

        Ok(())
    }
}

/// Builds the parameterized insert statement for the configured table.
fn build_insert_statement(sink: &InsertSinkConfig) -> String {
    let columns = sink.columns.join(", ");
    let placeholders = (1..=sink.columns.len())
        .map(|position| format!("${position}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "insert into {} ({}) values ({})",
        sink.table, columns, placeholders
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_statement_binds_each_column_positionally() {
        let sink = InsertSinkConfig {
            table: "person".to_string(),
            columns: vec![
                "first_name".to_string(),
                "last_name".to_string(),
                "city".to_string(),
            ],
        };

        assert_eq!(
            build_insert_statement(&sink),
            "insert into person (first_name, last_name, city) values ($1, $2, $3)"
        );
    }
}
