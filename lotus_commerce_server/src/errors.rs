use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use lotus_commerce_engine::{
    api::{ListApiError, PaymentApiError},
    paging::QueryTemplateError,
    traits::{AuthApiError, ExecutorError, OrderApiError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("Invalid list query. {0}")]
    QueryError(#[from] QueryTemplateError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::BAD_REQUEST,
            },
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            // Broken caller metadata is a programmer error and fails loudly; an undeclared
            // filter/sort field is client-input validation.
            Self::QueryError(e) => match e {
                QueryTemplateError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                QueryTemplateError::UnknownFilterField(_) => StatusCode::BAD_REQUEST,
                QueryTemplateError::InvalidFilterValue { .. } => StatusCode::BAD_REQUEST,
            },
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token provided")]
    MissingToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            // Deliberately collapsed: the response must not reveal whether the username or the
            // password was the problem.
            AuthApiError::InvalidCredentials | AuthApiError::AccountNotFound => Self::InvalidCredentials,
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<PaymentApiError> for ServerError {
    fn from(e: PaymentApiError) -> Self {
        match e {
            PaymentApiError::OrderError(OrderApiError::OrderNotFound(id)) => {
                Self::NoRecordFound(format!("Order {id}"))
            },
            PaymentApiError::OrderError(e) => Self::BackendError(e.to_string()),
            PaymentApiError::UrlError(e) => Self::InvalidRequestBody(e.to_string()),
        }
    }
}

impl From<ListApiError> for ServerError {
    fn from(e: ListApiError) -> Self {
        match e {
            ListApiError::Template(e) => Self::QueryError(e),
            ListApiError::Executor(ExecutorError::Unsupported) => {
                Self::ConfigurationError("The configured backend does not execute raw SQL.".to_string())
            },
            ListApiError::Executor(e) => Self::BackendError(e.to_string()),
        }
    }
}
