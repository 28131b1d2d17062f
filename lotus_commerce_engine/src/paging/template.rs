use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::paging::{errors::QueryTemplateError, FilterOperator, PagedQuery, SortDirection};

//--------------------------------------     SqlDialect     ----------------------------------------------------------
/// The two dialects the back office runs against. They differ only in identifier quoting and in
/// the paging clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    MySql,
    SqlServer,
}

impl SqlDialect {
    fn quote(&self, identifier: &str) -> String {
        match self {
            SqlDialect::MySql => format!("`{identifier}`"),
            SqlDialect::SqlServer => format!("[{identifier}]"),
        }
    }

    fn paging_clause(&self, skip: u64, take: u64) -> String {
        match self {
            SqlDialect::MySql => format!(" LIMIT {take} OFFSET {skip}"),
            SqlDialect::SqlServer => format!(" OFFSET {skip} ROWS FETCH NEXT {take} ROWS ONLY"),
        }
    }
}

impl Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::MySql => write!(f, "mysql"),
            SqlDialect::SqlServer => write!(f, "sqlserver"),
        }
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            other => Err(format!("Unknown SQL dialect: {other}")),
        }
    }
}

//--------------------------------------      SqlParam      ----------------------------------------------------------
/// A named bind parameter. The SQL text references it as `@<name>`; the executor binds it by
/// name, Dapper-style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlParam {
    pub name: String,
    pub value: serde_json::Value,
}

//--------------------------------------     SqlTemplate    ----------------------------------------------------------
/// The built statements for one list request. `count_sql` and `page_sql` share the same WHERE
/// clause and the same parameter set.
///
/// No consistency guarantee exists between executing the two: under concurrent writes the total
/// may drift from the visible page unless the caller wraps both in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlTemplate {
    pub count_sql: String,
    pub page_sql: String,
    pub parameters: Vec<SqlParam>,
}

fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {},
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl PagedQuery {
    /// Builds the count and page statements for the given dialect.
    ///
    /// Fails fast, before any SQL text exists: broken metadata is a
    /// [`QueryTemplateError::ConfigurationError`], an undeclared field in a filter/sort/search
    /// position is an [`QueryTemplateError::UnknownFilterField`].
    pub fn build(&self, dialect: SqlDialect) -> Result<SqlTemplate, QueryTemplateError> {
        self.validate_metadata()?;
        let known: BTreeSet<&str> = self.columns.iter().map(String::as_str).collect();

        let mut parameters = Vec::new();
        let mut conditions = Vec::new();
        for filter in &self.filters {
            if !known.contains(filter.field.as_str()) {
                return Err(QueryTemplateError::UnknownFilterField(filter.field.clone()));
            }
            let name = format!("p{}", parameters.len());
            let column = dialect.quote(&filter.field);
            let comparator = filter.operator.sql_comparator();
            let value = match filter.operator {
                FilterOperator::Contains => {
                    let text = filter.value.as_str().ok_or_else(|| {
                        QueryTemplateError::InvalidFilterValue {
                            field: filter.field.clone(),
                            reason: "'contains' requires a string value".to_string(),
                        }
                    })?;
                    json!(format!("%{text}%"))
                },
                _ => {
                    if filter.value.is_array() || filter.value.is_object() {
                        return Err(QueryTemplateError::InvalidFilterValue {
                            field: filter.field.clone(),
                            reason: "filter values must be scalars".to_string(),
                        });
                    }
                    filter.value.clone()
                },
            };
            conditions.push(format!("{column} {comparator} @{name}"));
            parameters.push(SqlParam { name, value });
        }

        if let Some(keywords) = self.keywords.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            for column in &self.search_columns {
                if !known.contains(column.as_str()) {
                    return Err(QueryTemplateError::UnknownFilterField(column.clone()));
                }
            }
            let name = format!("p{}", parameters.len());
            let likes = self
                .search_columns
                .iter()
                .map(|c| format!("{} LIKE @{name}", dialect.quote(c)))
                .collect::<Vec<_>>()
                .join(" OR ");
            conditions.push(format!("({likes})"));
            parameters.push(SqlParam { name, value: json!(format!("%{keywords}%")) });
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let table = dialect.quote(&self.table);
        let select_list =
            self.columns.iter().map(|c| dialect.quote(c)).collect::<Vec<_>>().join(", ");
        let count_sql = format!("SELECT COUNT(*) FROM {table} t1{where_clause}");

        let mut page_sql =
            format!("SELECT {select_list} FROM {table} t1{where_clause}{}", self.order_clause(dialect)?);
        if self.paging {
            page_sql.push_str(&dialect.paging_clause(self.skip, self.take));
        }

        trace!("📄️ Built {dialect} template: {page_sql}");
        Ok(SqlTemplate { count_sql, page_sql, parameters })
    }

    fn validate_metadata(&self) -> Result<(), QueryTemplateError> {
        if self.table.trim().is_empty() {
            return Err(QueryTemplateError::ConfigurationError("table name is not set".into()));
        }
        if self.columns.is_empty() {
            return Err(QueryTemplateError::ConfigurationError("column list is empty".into()));
        }
        for identifier in std::iter::once(&self.table)
            .chain(self.columns.iter())
            .chain(self.primary_keys.iter())
            .chain(self.search_columns.iter())
        {
            if !is_valid_identifier(identifier) {
                return Err(QueryTemplateError::ConfigurationError(format!(
                    "'{identifier}' is not a valid identifier"
                )));
            }
        }
        if self.keywords.as_deref().map(str::trim).filter(|k| !k.is_empty()).is_some()
            && self.search_columns.is_empty()
        {
            return Err(QueryTemplateError::ConfigurationError(
                "keyword search requires at least one search column".into(),
            ));
        }
        if self.paging && self.take == 0 {
            return Err(QueryTemplateError::ConfigurationError(
                "take must be at least 1 when paging".into(),
            ));
        }
        Ok(())
    }

    /// The ORDER BY clause, with the primary key(s) always appended after the requested sort so
    /// the page windows are deterministic and non-overlapping.
    fn order_clause(&self, dialect: SqlDialect) -> Result<String, QueryTemplateError> {
        let known: BTreeSet<&str> = self.columns.iter().map(String::as_str).collect();
        let mut terms = Vec::new();
        if let Some(order_by) = &self.order_by {
            if !known.contains(order_by.as_str()) {
                return Err(QueryTemplateError::UnknownFilterField(order_by.clone()));
            }
            terms.push(format!("{} {}", dialect.quote(order_by), self.direction));
        }
        let tiebreakers: Vec<&String> = if self.primary_keys.is_empty() {
            vec![&self.columns[0]]
        } else {
            self.primary_keys.iter().collect()
        };
        for key in tiebreakers {
            if self.order_by.as_ref() != Some(key) {
                terms.push(format!("{} ASC", dialect.quote(key)));
            }
        }
        Ok(format!(" ORDER BY {}", terms.join(", ")))
    }
}
