//! Scripted [`QueryExecutor`] double for model tests. Records every call and
//! keeps a statement open/close balance so leak checks can run without a
//! database.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::executor::{QueryExecutor, SqlError};
use super::value::{SqlRow, SqlValue};

pub enum MockResponse {
    Rows(Vec<SqlRow>),
    Affected(u64),
    Fail(SqlError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

#[derive(Default)]
struct MockState {
    responses: VecDeque<MockResponse>,
    calls: Vec<RecordedCall>,
    prepared: u64,
    closed: u64,
}

#[derive(Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rows(&self, rows: Vec<SqlRow>) {
        self.state.lock().unwrap().responses.push_back(MockResponse::Rows(rows));
    }

    pub fn push_affected(&self, count: u64) {
        self.state.lock().unwrap().responses.push_back(MockResponse::Affected(count));
    }

    pub fn push_error(&self, err: SqlError) {
        self.state.lock().unwrap().responses.push_back(MockResponse::Fail(err));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn prepared_count(&self) -> u64 {
        self.state.lock().unwrap().prepared
    }

    pub fn closed_count(&self) -> u64 {
        self.state.lock().unwrap().closed
    }

    /// Statements prepared but not yet closed. Must be zero between calls.
    pub fn open_statements(&self) -> u64 {
        let state = self.state.lock().unwrap();
        state.prepared - state.closed
    }

    fn begin(&self, sql: &str, params: &[SqlValue]) -> MockResponse {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        let response = state
            .responses
            .pop_front()
            .expect("MockExecutor: no scripted response left");
        // A failed prepare never yields a statement to close.
        if !matches!(response, MockResponse::Fail(SqlError::Prepare(_))) {
            state.prepared += 1;
        }
        response
    }

    fn close(&self) {
        self.state.lock().unwrap().closed += 1;
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>, SqlError> {
        match self.begin(sql, params) {
            MockResponse::Rows(rows) => {
                self.close();
                Ok(rows)
            }
            MockResponse::Fail(err) => {
                if !matches!(err, SqlError::Prepare(_)) {
                    self.close();
                }
                Err(err)
            }
            MockResponse::Affected(_) => panic!("scripted Affected response for fetch_all"),
        }
    }

    async fn fetch_one(&self, sql: &str, params: &[SqlValue]) -> Result<SqlRow, SqlError> {
        match self.begin(sql, params) {
            MockResponse::Rows(mut rows) => {
                self.close();
                if rows.is_empty() {
                    Err(SqlError::RowNotFound)
                } else {
                    Ok(rows.remove(0))
                }
            }
            MockResponse::Fail(err) => {
                if !matches!(err, SqlError::Prepare(_)) {
                    self.close();
                }
                Err(err)
            }
            MockResponse::Affected(_) => panic!("scripted Affected response for fetch_one"),
        }
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, SqlError> {
        match self.begin(sql, params) {
            MockResponse::Affected(count) => {
                self.close();
                Ok(count)
            }
            MockResponse::Fail(err) => {
                if !matches!(err, SqlError::Prepare(_)) {
                    self.close();
                }
                Err(err)
            }
            MockResponse::Rows(_) => panic!("scripted Rows response for execute"),
        }
    }
}
