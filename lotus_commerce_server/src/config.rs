use std::env;

use chrono::Duration;
use lcp_common::{parse_boolean_flag, Secret};
use log::*;
use lotus_commerce_engine::{paging::SqlDialect, vnpay::VnPayConfig};
use rand::{distributions::Alphanumeric, thread_rng, Rng};

const DEFAULT_LCP_HOST: &str = "127.0.0.1";
const DEFAULT_LCP_PORT: u16 = 8480;
const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;
const DEFAULT_PAYMENT_TIMEOUT_MINS: i64 = 15;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address,
    /// rather than the connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather
    /// than the connection's remote address.
    pub use_forwarded: bool,
    /// Which SQL dialect the admin list queries are generated for.
    pub sql_dialect: SqlDialect,
    pub auth: AuthConfig,
    /// VNPay merchant configuration.
    pub vnpay: VnPayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LCP_HOST.to_string(),
            port: DEFAULT_LCP_PORT,
            use_x_forwarded_for: false,
            use_forwarded: false,
            sql_dialect: SqlDialect::default(),
            auth: AuthConfig::default(),
            vnpay: VnPayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LCP_HOST").ok().unwrap_or_else(|| DEFAULT_LCP_HOST.into());
        let port = env::var("LCP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for LCP_PORT. {e} Using the default, {DEFAULT_LCP_PORT}, instead."
                    );
                    DEFAULT_LCP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_LCP_PORT);
        let use_x_forwarded_for = parse_boolean_flag(env::var("LCP_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("LCP_USE_FORWARDED").ok(), false);
        let sql_dialect = match env::var("LCP_SQL_DIALECT") {
            Ok(s) => s.parse::<SqlDialect>().unwrap_or_else(|e| {
                error!("🪛️ {e}. Using the default, {}, instead.", SqlDialect::default());
                SqlDialect::default()
            }),
            Err(_) => SqlDialect::default(),
        };
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let vnpay = vnpay_config_from_env();
        Self { host, port, use_x_forwarded_for, use_forwarded, sql_dialect, auth, vnpay }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The secret used to sign and verify access tokens (HMAC-SHA256).
    pub jwt_secret: Secret<String>,
    /// How long an issued access token stays valid. Permissions are baked in at issuance, so this
    /// is also how stale a user's permission set can get before a refresh picks up changes.
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. All issued \
             tokens die with this process. Set LCP_JWT_SECRET for production. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();
        Self {
            jwt_secret: Secret::new(secret),
            token_lifetime: Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS),
        }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, String> {
        let secret = env::var("LCP_JWT_SECRET").map_err(|e| format!("{e} [LCP_JWT_SECRET]"))?;
        if secret.len() < 32 {
            return Err("LCP_JWT_SECRET must be at least 32 characters".to_string());
        }
        let token_lifetime = env::var("LCP_JWT_LIFETIME_HOURS")
            .map_err(|_| {
                info!(
                    "🪛️ LCP_JWT_LIFETIME_HOURS is not set. Using the default value of \
                     {DEFAULT_TOKEN_LIFETIME_HOURS} hrs."
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Duration::hours)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for LCP_JWT_LIFETIME_HOURS. {e}"))
            })
            .ok()
            .unwrap_or_else(|| Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS));
        Ok(Self { jwt_secret: Secret::new(secret), token_lifetime })
    }
}

//-------------------------------------------------  VnPayConfig  ------------------------------------------------------
fn vnpay_config_from_env() -> VnPayConfig {
    let defaults = VnPayConfig::default();
    let gateway_url = env::var("LCP_VNP_GATEWAY_URL").ok().unwrap_or_else(|| {
        info!("🪛️ LCP_VNP_GATEWAY_URL is not set. Using the sandbox gateway.");
        defaults.gateway_url.clone()
    });
    let tmn_code = env::var("LCP_VNP_TMN_CODE").ok().unwrap_or_else(|| {
        error!("🪛️ LCP_VNP_TMN_CODE is not set. Please set it to your VNPay merchant code.");
        String::default()
    });
    let hash_secret = env::var("LCP_VNP_HASH_SECRET").ok().unwrap_or_else(|| {
        error!("🪛️ LCP_VNP_HASH_SECRET is not set. Payment URLs cannot be signed without it.");
        String::default()
    });
    let return_url = env::var("LCP_VNP_RETURN_URL").ok().unwrap_or_else(|| {
        error!("🪛️ LCP_VNP_RETURN_URL is not set. The gateway will have nowhere to send customers back to.");
        String::default()
    });
    let payment_timeout = env::var("LCP_VNP_PAYMENT_TIMEOUT_MINS")
        .ok()
        .and_then(|s| {
            s.parse::<i64>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for LCP_VNP_PAYMENT_TIMEOUT_MINS. {e}"))
                .ok()
        })
        .map(Duration::minutes)
        .unwrap_or(Duration::minutes(DEFAULT_PAYMENT_TIMEOUT_MINS));
    let api_version = env::var("LCP_VNP_API_VERSION").ok().unwrap_or_else(|| defaults.api_version.clone());
    let default_locale = env::var("LCP_VNP_LOCALE").ok().unwrap_or_else(|| defaults.default_locale.clone());
    VnPayConfig {
        gateway_url,
        tmn_code,
        hash_secret: Secret::new(hash_secret),
        return_url,
        api_version,
        default_locale,
        payment_timeout,
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// The subset of the server configuration that request handlers need. Kept small and free of
/// secrets so it can be passed around the app freely.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { use_x_forwarded_for: config.use_x_forwarded_for, use_forwarded: config.use_forwarded }
    }
}
