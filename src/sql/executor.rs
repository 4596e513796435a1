//! Query executor: prepare/execute/query capability behind a trait, with a
//! pooled PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Executor, PgPool, Statement};
use thiserror::Error;

use super::value::{SqlRow, SqlValue};

/// Persistence failure, tagged by the point where it occurred. Logged at the
/// point of origin and returned unchanged to the caller.
#[derive(Error, Debug)]
pub enum SqlError {
    #[error("prepare statement: {0}")]
    Prepare(#[source] sqlx::Error),
    #[error("execute query: {0}")]
    Execute(#[source] sqlx::Error),
    #[error("no rows in result set")]
    RowNotFound,
    #[error("decode column {column}: expected {expected}, found {found}")]
    Decode {
        column: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("rows affected unavailable: {0}")]
    RowsAffected(String),
}

impl SqlError {
    pub(crate) fn decode(column: usize, expected: &'static str, found: Option<&SqlValue>) -> Self {
        SqlError::Decode {
            column,
            expected,
            found: found.map(SqlValue::kind).unwrap_or("missing"),
        }
    }
}

/// Capability set required from a SQL connection: prepared statements bound
/// positionally, row sets, single-row fetch, and affected-row counts.
/// Implementations manage their own connection concurrency; statement and
/// connection release must be scoped to the call on every exit path.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>, SqlError>;

    /// Exactly one row; zero rows is [`SqlError::RowNotFound`].
    async fn fetch_one(&self, sql: &str, params: &[SqlValue]) -> Result<SqlRow, SqlError>;

    /// Runs a statement and returns the affected-row count.
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, SqlError>;
}

/// [`QueryExecutor`] over a sqlx connection pool. Statements are prepared
/// explicitly on an acquired connection; the connection returns to the pool
/// when the call ends, success or failure.
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>, SqlError> {
        tracing::debug!(sql = %sql, params = ?params, "query");
        let mut conn = self.pool.acquire().await.map_err(SqlError::Prepare)?;
        let stmt = (&mut *conn).prepare(sql).await.map_err(SqlError::Prepare)?;
        let mut query = stmt.query();
        for p in params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(&mut *conn).await.map_err(SqlError::Execute)?;
        Ok(rows.iter().map(row_to_values).collect())
    }

    async fn fetch_one(&self, sql: &str, params: &[SqlValue]) -> Result<SqlRow, SqlError> {
        tracing::debug!(sql = %sql, params = ?params, "query");
        let mut conn = self.pool.acquire().await.map_err(SqlError::Prepare)?;
        let stmt = (&mut *conn).prepare(sql).await.map_err(SqlError::Prepare)?;
        let mut query = stmt.query();
        for p in params {
            query = query.bind(p.clone());
        }
        let row = query
            .fetch_optional(&mut *conn)
            .await
            .map_err(SqlError::Execute)?;
        match row {
            Some(r) => Ok(row_to_values(&r)),
            None => Err(SqlError::RowNotFound),
        }
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, SqlError> {
        tracing::debug!(sql = %sql, params = ?params, "execute");
        let mut conn = self.pool.acquire().await.map_err(SqlError::Prepare)?;
        let stmt = (&mut *conn).prepare(sql).await.map_err(SqlError::Prepare)?;
        let mut query = stmt.query();
        for p in params {
            query = query.bind(p.clone());
        }
        let result = query.execute(&mut *conn).await.map_err(SqlError::Execute)?;
        Ok(result.rows_affected())
    }
}

fn row_to_values(row: &PgRow) -> SqlRow {
    use sqlx::Row;
    let width = row.columns().len();
    SqlRow::new((0..width).map(|i| cell_to_value(row, i)).collect())
}

fn cell_to_value(row: &PgRow, idx: usize) -> SqlValue {
    use sqlx::Row;
    if let Ok(v) = row.try_get::<Option<i16>, _>(idx) {
        if let Some(n) = v {
            return SqlValue::I64(n as i64);
        }
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(idx) {
        if let Some(n) = v {
            return SqlValue::I64(n as i64);
        }
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        if let Some(n) = v {
            return SqlValue::I64(n);
        }
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(idx) {
        if let Some(n) = v {
            return SqlValue::F64(n as f64);
        }
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        if let Some(n) = v {
            return SqlValue::F64(n);
        }
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        if let Some(b) = v {
            return SqlValue::Bool(b);
        }
    }
    if let Ok(v) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
        if let Some(u) = v {
            return SqlValue::Uuid(u);
        }
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        if let Some(t) = v {
            return SqlValue::Timestamp(t);
        }
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        if let Some(s) = v {
            return SqlValue::String(s);
        }
    }
    if let Ok(v) = row.try_get::<Option<serde_json::Value>, _>(idx) {
        if let Some(j) = v {
            return SqlValue::Json(j);
        }
    }
    SqlValue::Null
}
