use lcp_common::Vnd;
use lotus_commerce_engine::{api::IpnOutcome, vnpay::CallbackResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// The order total in Dong.
    pub amount: Vnd,
    pub order_info: String,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub txn_ref: String,
    /// The signed gateway URL the client redirects the customer to.
    pub payment_url: String,
}

/// The gateway's documented IPN acknowledgement body. Field names are part of the wire contract;
/// get them wrong and the gateway keeps retrying the notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpnResponse {
    #[serde(rename = "RspCode")]
    pub rsp_code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl From<&IpnOutcome> for IpnResponse {
    fn from(outcome: &IpnOutcome) -> Self {
        Self { rsp_code: outcome.rsp_code().to_string(), message: outcome.message().to_string() }
    }
}

/// What the frontend gets after the browser return leg. Informational only; order state never
/// changes on this path (the IPN is authoritative).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnSummary {
    pub signature_valid: bool,
    pub success: bool,
    pub txn_ref: Option<String>,
    pub amount: Option<Vnd>,
    pub response_code: Option<String>,
    pub order_info: Option<String>,
}

impl From<CallbackResult> for ReturnSummary {
    fn from(result: CallbackResult) -> Self {
        Self {
            signature_valid: result.signature_valid,
            success: result.is_successful(),
            txn_ref: result.txn_ref.as_ref().map(|t| t.as_str().to_string()),
            amount: result.amount,
            response_code: result.response_code,
            order_info: result.order_info,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult {
    pub total: i64,
    pub rows: Vec<serde_json::Value>,
}
