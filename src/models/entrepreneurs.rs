//! Entrepreneurs data access: list by product category, fetch by id, update
//! the profile url. Queries are static SQL with positional parameters; every
//! failure is logged where it happens and returned unchanged.

use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::sql::{QueryExecutor, SqlError, SqlRow, SqlValue};

/// A `users` row restricted to the entrepreneur-facing roles.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entrepreneur {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub url: String,
    pub role: String,
}

/// Body of the profile-url update. Constructed per request.
#[derive(Clone, Debug, Deserialize)]
pub struct EntrepreneurUpdate {
    pub url: String,
}

/// Narrowing parameters for entrepreneur queries. Each operation reads only
/// the field it needs.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntrepreneurFilter {
    pub category_id: i64,
    pub entrepreneur_id: i64,
}

const LIST_BY_CATEGORY_SQL: &str = r#"
    SELECT u.id, u.name, u.email, u.url, u.role
    FROM users u
    INNER JOIN products p ON p.entrepreneur_id = u.id
    WHERE p.category_id = $1
    AND u.role IN ('entrepreneur', 'admin')
    GROUP BY u.id
"#;

const GET_BY_ID_SQL: &str = r#"
    SELECT u.id, u.name, u.email, u.url, u.role
    FROM users u
    WHERE u.id = $1
    AND u.role IN ('entrepreneur', 'admin')
"#;

const UPDATE_URL_SQL: &str = r#"
    UPDATE users
    SET url = $1
    WHERE id = $2
"#;

pub struct EntrepreneursModel;

impl EntrepreneursModel {
    /// Entrepreneurs owning at least one product in the given category, one
    /// entry per user. Empty category yields an empty list, not an error.
    pub async fn get_entrepreneurs(
        ctx: &RequestContext,
        filter: &EntrepreneurFilter,
        executor: &dyn QueryExecutor,
    ) -> Result<Vec<Entrepreneur>, SqlError> {
        let params = vec![SqlValue::I64(filter.category_id)];
        let rows = executor
            .fetch_all(LIST_BY_CATEGORY_SQL, &params)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    request_id = %ctx.request_id_or_placeholder(),
                    "list entrepreneurs query failed"
                );
                e
            })?;

        let mut entrepreneurs = Vec::with_capacity(rows.len());
        for row in &rows {
            let entrepreneur = row_to_entrepreneur(row).map_err(|e| {
                tracing::error!(
                    error = %e,
                    request_id = %ctx.request_id_or_placeholder(),
                    "decode entrepreneur row failed"
                );
                e
            })?;
            entrepreneurs.push(entrepreneur);
        }
        Ok(entrepreneurs)
    }

    /// Single entrepreneur by id. A missing row and an execution failure
    /// share the error path; callers see one `SqlError` either way.
    pub async fn get_entrepreneur(
        ctx: &RequestContext,
        filter: &EntrepreneurFilter,
        executor: &dyn QueryExecutor,
    ) -> Result<Entrepreneur, SqlError> {
        let params = vec![SqlValue::I64(filter.entrepreneur_id)];
        let row = executor
            .fetch_one(GET_BY_ID_SQL, &params)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    request_id = %ctx.request_id_or_placeholder(),
                    "get entrepreneur query failed"
                );
                e
            })?;
        row_to_entrepreneur(&row).map_err(|e| {
            tracing::error!(
                error = %e,
                request_id = %ctx.request_id_or_placeholder(),
                "decode entrepreneur row failed"
            );
            e
        })
    }

    /// Sets the profile url for the given id. Zero affected rows still
    /// succeeds; the count is only reported in the diagnostic log line.
    pub async fn update_url_entrepreneur(
        ctx: &RequestContext,
        entrepreneur_id: i64,
        payload: &EntrepreneurUpdate,
        executor: &dyn QueryExecutor,
    ) -> Result<(), SqlError> {
        let params = vec![
            SqlValue::String(payload.url.clone()),
            SqlValue::I64(entrepreneur_id),
        ];
        let rows_affected = executor
            .execute(UPDATE_URL_SQL, &params)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    request_id = %ctx.request_id_or_placeholder(),
                    "update entrepreneur url failed"
                );
                e
            })?;

        tracing::info!(
            rows_affected,
            request_id = %ctx.request_id_or_placeholder(),
            "updated entrepreneur url"
        );
        Ok(())
    }
}

fn row_to_entrepreneur(row: &SqlRow) -> Result<Entrepreneur, SqlError> {
    Ok(Entrepreneur {
        id: row.get_i64(0)?,
        name: row.get_string(1)?,
        email: row.get_string(2)?,
        url: row.get_string(3)?,
        role: row.get_string(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::mock::MockExecutor;

    fn ctx() -> RequestContext {
        RequestContext::new(Some("test-req".into()))
    }

    fn entrepreneur_row(id: i64, name: &str) -> SqlRow {
        SqlRow::new(vec![
            SqlValue::I64(id),
            SqlValue::String(name.into()),
            SqlValue::String(format!("{name}@example.com")),
            SqlValue::String(format!("https://example.com/{name}")),
            SqlValue::String("entrepreneur".into()),
        ])
    }

    fn execute_failure() -> SqlError {
        SqlError::Execute(sqlx::Error::Protocol("connection reset".into()))
    }

    #[tokio::test]
    async fn empty_category_yields_empty_list() {
        let executor = MockExecutor::new();
        executor.push_rows(vec![]);

        let filter = EntrepreneurFilter {
            category_id: 9,
            ..Default::default()
        };
        let result = EntrepreneursModel::get_entrepreneurs(&ctx(), &filter, &executor)
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(executor.open_statements(), 0);
    }

    #[tokio::test]
    async fn list_binds_category_and_restricts_roles() {
        let executor = MockExecutor::new();
        executor.push_rows(vec![]);

        let filter = EntrepreneurFilter {
            category_id: 14,
            ..Default::default()
        };
        EntrepreneursModel::get_entrepreneurs(&ctx(), &filter, &executor)
            .await
            .unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].sql.contains("p.category_id = $1"));
        assert!(calls[0].sql.contains("u.role IN ('entrepreneur', 'admin')"));
        assert!(calls[0].sql.contains("GROUP BY u.id"));
        assert_eq!(calls[0].params, vec![SqlValue::I64(14)]);
    }

    #[tokio::test]
    async fn list_maps_each_row_once() {
        let executor = MockExecutor::new();
        executor.push_rows(vec![
            entrepreneur_row(1, "ana"),
            entrepreneur_row(2, "luis"),
            entrepreneur_row(3, "marta"),
        ]);

        let filter = EntrepreneurFilter {
            category_id: 2,
            ..Default::default()
        };
        let result = EntrepreneursModel::get_entrepreneurs(&ctx(), &filter, &executor)
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
        let mut ids: Vec<i64> = result.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(result[0].name, "ana");
        assert_eq!(result[0].email, "ana@example.com");
        assert_eq!(result[0].url, "https://example.com/ana");
        assert_eq!(result[0].role, "entrepreneur");
    }

    #[tokio::test]
    async fn list_surfaces_decode_failure() {
        let executor = MockExecutor::new();
        // id column holds a string, so row mapping must fail
        executor.push_rows(vec![SqlRow::new(vec![
            SqlValue::String("oops".into()),
            SqlValue::String("ana".into()),
            SqlValue::String("ana@example.com".into()),
            SqlValue::String("".into()),
            SqlValue::String("entrepreneur".into()),
        ])]);

        let filter = EntrepreneurFilter::default();
        let err = EntrepreneursModel::get_entrepreneurs(&ctx(), &filter, &executor)
            .await
            .unwrap_err();

        assert!(matches!(err, SqlError::Decode { column: 0, .. }));
        assert_eq!(executor.open_statements(), 0);
    }

    #[tokio::test]
    async fn list_propagates_executor_failure_unchanged() {
        let executor = MockExecutor::new();
        executor.push_error(execute_failure());

        let filter = EntrepreneurFilter::default();
        let err = EntrepreneursModel::get_entrepreneurs(&ctx(), &filter, &executor)
            .await
            .unwrap_err();

        assert!(matches!(err, SqlError::Execute(_)));
        assert_eq!(executor.open_statements(), 0);
    }

    #[tokio::test]
    async fn get_returns_the_matching_record() {
        let executor = MockExecutor::new();
        executor.push_rows(vec![entrepreneur_row(7, "ana")]);

        let filter = EntrepreneurFilter {
            entrepreneur_id: 7,
            ..Default::default()
        };
        let result = EntrepreneursModel::get_entrepreneur(&ctx(), &filter, &executor)
            .await
            .unwrap();

        assert_eq!(
            result,
            Entrepreneur {
                id: 7,
                name: "ana".into(),
                email: "ana@example.com".into(),
                url: "https://example.com/ana".into(),
                role: "entrepreneur".into(),
            }
        );

        let calls = executor.calls();
        assert!(calls[0].sql.contains("u.id = $1"));
        assert!(calls[0].sql.contains("u.role IN ('entrepreneur', 'admin')"));
        assert_eq!(calls[0].params, vec![SqlValue::I64(7)]);
    }

    #[tokio::test]
    async fn get_missing_row_is_an_error() {
        let executor = MockExecutor::new();
        executor.push_rows(vec![]);

        let filter = EntrepreneurFilter {
            entrepreneur_id: 404,
            ..Default::default()
        };
        let err = EntrepreneursModel::get_entrepreneur(&ctx(), &filter, &executor)
            .await
            .unwrap_err();

        assert!(matches!(err, SqlError::RowNotFound));
        assert_eq!(executor.open_statements(), 0);
    }

    #[tokio::test]
    async fn get_propagates_executor_failure_unchanged() {
        let executor = MockExecutor::new();
        executor.push_error(execute_failure());

        let filter = EntrepreneurFilter {
            entrepreneur_id: 1,
            ..Default::default()
        };
        let err = EntrepreneursModel::get_entrepreneur(&ctx(), &filter, &executor)
            .await
            .unwrap_err();

        assert!(matches!(err, SqlError::Execute(_)));
    }

    #[tokio::test]
    async fn update_binds_url_then_id() {
        let executor = MockExecutor::new();
        executor.push_affected(1);

        let payload = EntrepreneurUpdate {
            url: "http://x".into(),
        };
        EntrepreneursModel::update_url_entrepreneur(&ctx(), 7, &payload, &executor)
            .await
            .unwrap();

        let calls = executor.calls();
        assert!(calls[0].sql.contains("SET url = $1"));
        assert!(calls[0].sql.contains("WHERE id = $2"));
        assert_eq!(
            calls[0].params,
            vec![SqlValue::String("http://x".into()), SqlValue::I64(7)]
        );
    }

    #[tokio::test]
    async fn update_of_missing_id_silently_succeeds() {
        let executor = MockExecutor::new();
        executor.push_affected(0);

        let payload = EntrepreneurUpdate {
            url: "http://x".into(),
        };
        let result =
            EntrepreneursModel::update_url_entrepreneur(&ctx(), 99999, &payload, &executor).await;

        assert!(result.is_ok());
        assert_eq!(executor.open_statements(), 0);
    }

    #[tokio::test]
    async fn update_propagates_prepare_failure() {
        let executor = MockExecutor::new();
        executor.push_error(SqlError::Prepare(sqlx::Error::Protocol(
            "syntax error".into(),
        )));

        let payload = EntrepreneurUpdate {
            url: "http://x".into(),
        };
        let err = EntrepreneursModel::update_url_entrepreneur(&ctx(), 1, &payload, &executor)
            .await
            .unwrap_err();

        assert!(matches!(err, SqlError::Prepare(_)));
        // prepare failed, so no statement was ever opened
        assert_eq!(executor.prepared_count(), 0);
        assert_eq!(executor.open_statements(), 0);
    }

    #[tokio::test]
    async fn update_propagates_rows_affected_failure() {
        let executor = MockExecutor::new();
        executor.push_error(SqlError::RowsAffected("driver gave no count".into()));

        let payload = EntrepreneurUpdate {
            url: "http://x".into(),
        };
        let err = EntrepreneursModel::update_url_entrepreneur(&ctx(), 1, &payload, &executor)
            .await
            .unwrap_err();

        assert!(matches!(err, SqlError::RowsAffected(_)));
        assert_eq!(executor.prepared_count(), executor.closed_count());
    }

    #[tokio::test]
    async fn statements_balance_across_mixed_outcomes() {
        let executor = MockExecutor::new();
        executor.push_rows(vec![entrepreneur_row(1, "ana")]);
        executor.push_error(execute_failure());
        executor.push_affected(1);

        let filter = EntrepreneurFilter {
            category_id: 1,
            entrepreneur_id: 1,
        };
        let payload = EntrepreneurUpdate {
            url: "http://x".into(),
        };
        let _ = EntrepreneursModel::get_entrepreneurs(&ctx(), &filter, &executor).await;
        let _ = EntrepreneursModel::get_entrepreneur(&ctx(), &filter, &executor).await;
        let _ = EntrepreneursModel::update_url_entrepreneur(&ctx(), 1, &payload, &executor).await;

        assert_eq!(executor.prepared_count(), 3);
        assert_eq!(executor.closed_count(), 3);
        assert_eq!(executor.open_statements(), 0);
    }
}
