use chrono::Duration;
use lcp_common::Secret;

pub const DEFAULT_GATEWAY_URL: &str = "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html";
pub const DEFAULT_API_VERSION: &str = "2.1.0";
pub const DEFAULT_LOCALE: &str = "vn";
const DEFAULT_PAYMENT_TIMEOUT_MINS: i64 = 15;

/// Merchant-side VNPay configuration. The hash secret is shared with the gateway and signs every
/// outbound URL and verifies every inbound callback; treat it like a password.
///
/// These values are injected by whoever assembles the application (environment variables in the
/// server crate). Nothing in the engine reads process-global state.
#[derive(Clone, Debug)]
pub struct VnPayConfig {
    /// Base URL of the gateway's payment page.
    pub gateway_url: String,
    /// The merchant code assigned by VNPay (`vnp_TmnCode`).
    pub tmn_code: String,
    /// The shared HMAC secret.
    pub hash_secret: Secret<String>,
    /// Where the gateway sends the customer's browser after payment.
    pub return_url: String,
    /// Gateway API version (`vnp_Version`).
    pub api_version: String,
    /// Locale for the gateway's payment page when the request doesn't specify one.
    pub default_locale: String,
    /// How long a payment URL stays valid (`vnp_ExpireDate` is the creation time plus this).
    pub payment_timeout: Duration,
}

impl Default for VnPayConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            tmn_code: String::default(),
            hash_secret: Secret::default(),
            return_url: String::default(),
            api_version: DEFAULT_API_VERSION.to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
            payment_timeout: Duration::minutes(DEFAULT_PAYMENT_TIMEOUT_MINS),
        }
    }
}
