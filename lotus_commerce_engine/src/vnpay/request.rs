use std::{fmt::Display, net::IpAddr, str::FromStr};

use chrono::{DateTime, Utc};
use lcp_common::Vnd;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The merchant transaction reference (`vnp_TxnRef`). This is the key the gateway echoes back in
/// every callback; the order store correlates it with the order record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnRef(String);

impl TxnRef {
    /// A new reference, unique per checkout attempt: the current millisecond tick plus a short
    /// random suffix so that two checkouts in the same millisecond don't collide.
    pub fn generate() -> Self {
        let tick = Utc::now().timestamp_millis();
        let suffix: u16 = rand::thread_rng().gen();
        Self(format!("{tick}{suffix:04x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TxnRef {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for TxnRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for TxnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the gateway needs to render a payment page for one checkout attempt.
///
/// This is an ephemeral value object: build one per attempt, sign it, throw it away. The engine
/// does not persist it; correlating `txn_ref` with an order record is the order store's job.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub txn_ref: TxnRef,
    /// The order total in Dong. The ×100 minor-unit conversion happens at signing time.
    pub amount: Vnd,
    /// Free-text description shown on the gateway's payment page.
    pub order_info: String,
    /// Gateway goods-category code (`vnp_OrderType`).
    pub order_type: String,
    /// The customer's IP address as seen by the merchant.
    pub ip_address: IpAddr,
    /// When this checkout attempt was created. Converted to the gateway's timezone on signing.
    pub created_at: DateTime<Utc>,
    /// Overrides the configured return URL for this request only.
    pub return_url: Option<String>,
    /// Payment-page locale; falls back to the configured default.
    pub locale: Option<String>,
    /// Pre-selects a bank on the payment page when present.
    pub bank_code: Option<String>,
}

impl PaymentRequest {
    pub fn new(txn_ref: TxnRef, amount: Vnd, order_info: String, ip_address: IpAddr) -> Self {
        Self {
            txn_ref,
            amount,
            order_info,
            order_type: "other".to_string(),
            ip_address,
            created_at: Utc::now(),
            return_url: None,
            locale: None,
            bank_code: None,
        }
    }

    pub fn with_order_type<S: Into<String>>(mut self, order_type: S) -> Self {
        self.order_type = order_type.into();
        self
    }

    pub fn with_locale<S: Into<String>>(mut self, locale: S) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_bank_code<S: Into<String>>(mut self, bank_code: S) -> Self {
        self.bank_code = Some(bank_code.into());
        self
    }

    pub fn with_return_url<S: Into<String>>(mut self, return_url: S) -> Self {
        self.return_url = Some(return_url.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
