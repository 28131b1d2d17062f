use thiserror::Error;

use crate::traits::CustomerAccount;

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("User account not found")]
    AccountNotFound,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Behaviour the identity store must provide for login and token issuance.
///
/// Password storage, hashing policy and account lifecycle are entirely the implementation's
/// business; the engine only needs a yes/no on credentials and the flattened permission codes
/// that go into the compressed claim.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Checks the credentials and returns the matching account.
    /// Implementations must not reveal whether the username or the password was wrong.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CustomerAccount, AuthApiError>;

    /// The full, flattened set of permission codes for the account, across all of its roles.
    async fn permissions_for_account(&self, account_id: i64) -> Result<Vec<String>, AuthApiError>;
}
