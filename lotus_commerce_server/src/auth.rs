use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lcp_common::Secret;
use lotus_commerce_engine::{claims, claims::PermissionSet, traits::CustomerAccount};
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::AuthError};

/// The claims baked into every access token.
///
/// `permissions` holds one or more codec-compressed claim tokens (one per role in the original
/// system). They are opaque strings here; [`JwtClaims::permission_set`] expands and unions them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The account id, as a string subject.
    pub sub: String,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    /// Expands the compressed permission claims. Fails closed: an undecodable claim contributes
    /// nothing, so a tampered token degrades to fewer permissions, never more.
    pub fn permission_set(&self) -> PermissionSet {
        claims::decode_all(self.permissions.iter().map(String::as_str))
    }
}

/// Signs access tokens with the server's HS256 secret.
pub struct TokenIssuer {
    secret: Secret<String>,
    lifetime: chrono::Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { secret: config.jwt_secret.clone(), lifetime: config.token_lifetime }
    }

    /// Issues a new access token for the given account.
    ///
    /// This method DOES NOT verify the account's credentials or permissions; that must be done
    /// before calling it. The permission tokens are embedded as-is.
    pub fn issue_token(
        &self,
        account: &CustomerAccount,
        permission_tokens: Vec<String>,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: account.id.to_string(),
            name: account.username.clone(),
            permissions: permission_tokens,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        let key = EncodingKey::from_secret(self.secret.reveal().as_bytes());
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(|e| AuthError::ValidationError(format!("{e}")))
    }
}

/// Validates an access token's signature and expiry and returns its claims.
pub fn validate_token(token: &str, secret: &Secret<String>) -> Result<JwtClaims, AuthError> {
    let key = DecodingKey::from_secret(secret.reveal().as_bytes());
    jsonwebtoken::decode::<JwtClaims>(token, &key, &Validation::new(Algorithm::HS256))
        .map(|data| data.claims)
        .map_err(|e| AuthError::ValidationError(format!("{e}")))
}
