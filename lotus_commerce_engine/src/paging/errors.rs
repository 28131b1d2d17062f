use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryTemplateError {
    /// Programmer-supplied metadata is broken (empty table name, empty column list, bad
    /// identifier). These should never survive integration testing, so they propagate loudly.
    #[error("Invalid query configuration. {0}")]
    ConfigurationError(String),
    /// A filter, sort or search field is not in the declared column set. This is caller-input
    /// validation (HTTP 400 territory), not a server fault.
    #[error("Unknown filter field: {0}")]
    UnknownFilterField(String),
    /// The filter value cannot be used with the requested operator.
    #[error("Invalid filter value for field '{field}': {reason}")]
    InvalidFilterValue { field: String, reason: String },
}
