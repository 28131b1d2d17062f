use thiserror::Error;

use crate::{
    paging::{PagedQuery, QueryTemplateError, SqlDialect},
    traits::{ExecutorError, SqlExecutor},
};

#[derive(Debug, Clone, Error)]
pub enum ListApiError {
    #[error("{0}")]
    Template(#[from] QueryTemplateError),
    #[error("Query execution failed. {0}")]
    Executor(#[from] ExecutorError),
}

/// Runs a back-office list request: builds the count + page statements for the configured
/// dialect and executes both through the backend's raw-SQL boundary.
///
/// The two statements are executed back to back without a shared transaction, so the total can
/// drift from the visible page under concurrent writes. The original system lived with that and
/// so does this one.
#[derive(Debug, Clone)]
pub struct ListApi<B> {
    dialect: SqlDialect,
    db: B,
}

impl<B> ListApi<B>
where B: SqlExecutor
{
    pub fn new(dialect: SqlDialect, db: B) -> Self {
        Self { dialect, db }
    }

    pub async fn fetch_page(
        &self,
        query: &PagedQuery,
    ) -> Result<(i64, Vec<serde_json::Value>), ListApiError> {
        let template = query.build(self.dialect)?;
        let total = self.db.fetch_count(&template.count_sql, &template.parameters).await?;
        let rows = self.db.fetch_rows(&template.page_sql, &template.parameters).await?;
        Ok((total, rows))
    }
}
