use thiserror::Error;

use crate::paging::SqlParam;

#[derive(Debug, Clone, Error)]
pub enum ExecutorError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The configured backend does not execute raw SQL")]
    Unsupported,
}

/// A Dapper-like raw-SQL execution boundary for the admin list screens.
///
/// The engine builds the statements (see [`crate::paging`]); an external adapter runs them.
/// Parameters are bound by name (`@p0`, `@p1`, ...). Rows come back as JSON objects because the
/// back-office grid is schemaless from the engine's point of view.
#[allow(async_fn_in_trait)]
pub trait SqlExecutor {
    async fn fetch_rows(
        &self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<serde_json::Value>, ExecutorError>;

    async fn fetch_count(&self, sql: &str, params: &[SqlParam]) -> Result<i64, ExecutorError>;
}
