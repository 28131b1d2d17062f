use log::debug;

use crate::{
    claims,
    claims::PermissionSet,
    traits::{AuthApiError, AuthManagement, CustomerAccount},
};

/// Drives the login path: credentials in, account plus compressed permission claim out.
#[derive(Debug, Clone)]
pub struct AuthApi<B> {
    db: B,
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Verifies the credentials and produces the claim token that goes into the access token.
    ///
    /// This is a create-only path: the token is built once per login/refresh and never mutated.
    /// A fresh login (or refresh) picks up permission changes; an outstanding token does not.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(CustomerAccount, String), AuthApiError> {
        let account = self.db.verify_credentials(username, password).await?;
        let permissions = self.db.permissions_for_account(account.id).await?;
        let set: PermissionSet = permissions.into_iter().collect();
        let token = claims::encode(&set);
        debug!("🔑️ Login for {}: {} permission codes compressed into one claim", account.username, set.len());
        Ok((account, token))
    }
}
