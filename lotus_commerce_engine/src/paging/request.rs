use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ParseEnumError(String);

//--------------------------------------   SortDirection   -----------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ParseEnumError(format!("Invalid sort direction: {other}"))),
        }
    }
}

//--------------------------------------   FilterOperator   ----------------------------------------------------------
/// The fixed operator whitelist. Operators arrive from the client as strings and map onto SQL
/// through [`FilterOperator::sql_comparator`]; the raw string never reaches the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Contains,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl FilterOperator {
    pub fn sql_comparator(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Neq => "<>",
            FilterOperator::Contains => "LIKE",
            FilterOperator::Gt => ">",
            FilterOperator::Lt => "<",
            FilterOperator::Gte => ">=",
            FilterOperator::Lte => "<=",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "contains" => Ok(Self::Contains),
            "gt" => Ok(Self::Gt),
            "lt" => Ok(Self::Lt),
            "gte" => Ok(Self::Gte),
            "lte" => Ok(Self::Lte),
            other => Err(ParseEnumError(format!("Invalid filter operator: {other}"))),
        }
    }
}

//--------------------------------------   PropertyFilter   ----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: serde_json::Value,
}

impl PropertyFilter {
    pub fn new<S: Into<String>, V: Into<serde_json::Value>>(
        field: S,
        operator: FilterOperator,
        value: V,
    ) -> Self {
        Self { field: field.into(), operator, value: value.into() }
    }
}

//--------------------------------------     PagedQuery     ----------------------------------------------------------
/// One admin list request: table metadata plus the client's filter/sort/page choices.
///
/// Built fresh per request, never persisted. `take` must be at least 1 whenever `paging` is on;
/// `skip` starts at 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedQuery {
    pub table: String,
    pub columns: Vec<String>,
    /// Appended to every `ORDER BY` as the deterministic tiebreaker. Falls back to the first
    /// declared column when empty.
    #[serde(default)]
    pub primary_keys: Vec<String>,
    /// The subset of columns a keyword search runs over.
    #[serde(default)]
    pub search_columns: Vec<String>,
    #[serde(default)]
    pub filters: Vec<PropertyFilter>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_take")]
    pub take: u64,
    #[serde(default = "default_paging")]
    pub paging: bool,
}

fn default_take() -> u64 {
    20
}

fn default_paging() -> bool {
    true
}

impl PagedQuery {
    pub fn new<S: Into<String>, C: Into<String>>(table: S, columns: Vec<C>) -> Self {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            primary_keys: Vec::new(),
            search_columns: Vec::new(),
            filters: Vec::new(),
            keywords: None,
            order_by: None,
            direction: SortDirection::default(),
            skip: 0,
            take: default_take(),
            paging: default_paging(),
        }
    }

    pub fn with_primary_keys<S: Into<String>>(mut self, keys: Vec<S>) -> Self {
        self.primary_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_search_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.search_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, filter: PropertyFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: S) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_order_by<S: Into<String>>(mut self, column: S, direction: SortDirection) -> Self {
        self.order_by = Some(column.into());
        self.direction = direction;
        self
    }

    pub fn with_page(mut self, skip: u64, take: u64) -> Self {
        self.skip = skip;
        self.take = take;
        self
    }

    pub fn without_paging(mut self) -> Self {
        self.paging = false;
        self
    }
}
