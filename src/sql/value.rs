//! Bind/decode values exchanged with the query executor.

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

use super::executor::SqlError;

/// A value that can be bound to a PostgreSQL query or decoded from a result
/// column.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Uuid(uuid::Uuid),
    Timestamp(chrono::DateTime<chrono::Utc>),
    Json(Value),
}

impl SqlValue {
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::I64(_) => "i64",
            SqlValue::F64(_) => "f64",
            SqlValue::String(_) => "string",
            SqlValue::Uuid(_) => "uuid",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Json(_) => "json",
        }
    }
}

impl<'q> Encode<'q, Postgres> for SqlValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            SqlValue::Null => <Option<i32> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            SqlValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            SqlValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlValue::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            SqlValue::Uuid(u) => {
                let u_str = u.to_string();
                <&str as Encode<Postgres>>::encode_by_ref(&u_str.as_str(), buf)?
            }
            SqlValue::Timestamp(t) => {
                <chrono::DateTime<chrono::Utc> as Encode<Postgres>>::encode_by_ref(t, buf)?
            }
            SqlValue::Json(v) => <serde_json::Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            SqlValue::Null | SqlValue::String(_) | SqlValue::Uuid(_) => {
                PgTypeInfo::with_name("TEXT")
            }
            SqlValue::Bool(_) => PgTypeInfo::with_name("BOOL"),
            SqlValue::I64(_) => PgTypeInfo::with_name("INT8"),
            SqlValue::F64(_) => PgTypeInfo::with_name("FLOAT8"),
            SqlValue::Timestamp(_) => PgTypeInfo::with_name("TIMESTAMPTZ"),
            SqlValue::Json(_) => PgTypeInfo::with_name("JSONB"),
        })
    }
}

impl sqlx::Type<Postgres> for SqlValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

/// One decoded result row. Columns are positional, in SELECT order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SqlRow {
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<&SqlValue> {
        self.values.get(column)
    }

    pub fn get_i64(&self, column: usize) -> Result<i64, SqlError> {
        match self.get(column) {
            Some(SqlValue::I64(n)) => Ok(*n),
            other => Err(SqlError::decode(column, "i64", other)),
        }
    }

    pub fn get_string(&self, column: usize) -> Result<String, SqlError> {
        match self.get(column) {
            Some(SqlValue::String(s)) => Ok(s.clone()),
            other => Err(SqlError::decode(column, "string", other)),
        }
    }
}
