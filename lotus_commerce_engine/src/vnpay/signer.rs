//! The build half of the gateway flow: canonical sign-string construction, the HMAC itself, and
//! payment-URL assembly. The verify half ([`crate::vnpay::CallbackData`]) calls back into
//! [`sign_data`] and [`hmac_sha512_hex`] so the two directions can never drift apart.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use hmac::{Hmac, Mac};
use lcp_common::{Secret, Vnd, VND_CURRENCY_CODE};
use sha2::Sha512;
use thiserror::Error;

use crate::vnpay::{
    callback::{VNP_SECURE_HASH, VNP_SECURE_HASH_TYPE},
    PaymentRequest,
    VnPayConfig,
};

pub const VNP_COMMAND_PAY: &str = "pay";
/// Timestamp format mandated by the gateway: `yyyyMMddHHmmss`, in the gateway's own timezone.
pub const GATEWAY_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone, Error)]
pub enum PaymentUrlError {
    #[error("Order amount may not be negative: {0}")]
    NegativeAmount(Vnd),
}

/// The gateway operates in Indochina Time (GMT+7) regardless of where the merchant's servers run.
pub fn gateway_timezone() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).expect("+07:00 is a valid offset")
}

/// Formats a UTC instant the way the gateway wants it: converted to GMT+7, `yyyyMMddHHmmss`.
pub fn format_gateway_time(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&gateway_timezone()).format(GATEWAY_TIME_FORMAT).to_string()
}

/// Builds the canonical string that gets signed, which doubles as the encoded query string.
///
/// `BTreeMap` iteration gives the byte-ordered key sort the gateway requires. Empty values and
/// the hash fields themselves are excluded; everything else participates, including any extra
/// parameters the gateway decides to append in a callback.
pub fn sign_data(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(k, v)| {
            !v.is_empty() && k.as_str() != VNP_SECURE_HASH && k.as_str() != VNP_SECURE_HASH_TYPE
        })
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// HMAC-SHA512 over `data`, hex-encoded in lower case.
pub fn hmac_sha512_hex(secret: &Secret<String>, data: &str) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.reveal().as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().iter().map(|b| format!("{b:02x}")).collect()
}

/// Builds the complete signed redirect URL for one checkout attempt.
///
/// Pure: no I/O, no clock reads (the caller stamps `created_at`), no persistence. Recording the
/// `txn_ref` ↔ order correlation is the caller's job.
pub fn create_payment_url(
    config: &VnPayConfig,
    request: &PaymentRequest,
) -> Result<String, PaymentUrlError> {
    if request.amount.value() < 0 {
        return Err(PaymentUrlError::NegativeAmount(request.amount));
    }
    let return_url = request.return_url.as_deref().unwrap_or(&config.return_url);
    let locale = request.locale.as_deref().unwrap_or(&config.default_locale);
    let expires_at = request.created_at + config.payment_timeout;

    let mut params = BTreeMap::new();
    let mut add = |key: &str, value: String| {
        params.insert(key.to_string(), value);
    };
    add("vnp_Version", config.api_version.clone());
    add("vnp_Command", VNP_COMMAND_PAY.to_string());
    add("vnp_TmnCode", config.tmn_code.clone());
    add("vnp_Amount", request.amount.gateway_amount().to_string());
    add("vnp_CreateDate", format_gateway_time(request.created_at));
    add("vnp_ExpireDate", format_gateway_time(expires_at));
    add("vnp_CurrCode", VND_CURRENCY_CODE.to_string());
    add("vnp_IpAddr", request.ip_address.to_string());
    add("vnp_Locale", locale.to_string());
    add("vnp_OrderInfo", request.order_info.clone());
    add("vnp_OrderType", request.order_type.clone());
    add("vnp_ReturnUrl", return_url.to_string());
    add("vnp_TxnRef", request.txn_ref.as_str().to_string());
    if let Some(bank_code) = &request.bank_code {
        add("vnp_BankCode", bank_code.clone());
    }

    let query = sign_data(&params);
    let digest = hmac_sha512_hex(&config.hash_secret, &query);
    Ok(format!("{}?{query}&{VNP_SECURE_HASH}={digest}", config.gateway_url))
}
