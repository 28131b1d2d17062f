//! Generic filter/sort/page SQL templates for the admin back office's list screens.
//!
//! Every admin grid issues the same shape of request: a table, a column list, optional property
//! filters and keyword search, a sort column, and a page window. This module turns that request
//! into two SQL statements (a `COUNT(*)` and a page query) with Dapper-style `@p<n>` named
//! parameters. User-supplied *values* only ever travel as parameters; user-supplied *identifiers*
//! (filter fields, sort column, search columns) are validated against the declared column set and
//! rejected otherwise, which is the SQL-injection guard.
//!
//! The template builder guarantees a deterministic row order by always appending the primary
//! key(s) as a tiebreaker after the requested sort. Paging without a total order silently
//! shuffles rows between pages; that class of bug is designed out here rather than left to each
//! caller.
//!
//! Execution is external (see [`crate::traits::SqlExecutor`]); so is snapshot consistency between
//! the count and the page query. Run both in one transaction if drift matters.

mod errors;
mod request;
mod template;

pub use errors::QueryTemplateError;
pub use request::{FilterOperator, PagedQuery, PropertyFilter, SortDirection};
pub use template::{SqlDialect, SqlParam, SqlTemplate};
