use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use lcp_common::{Secret, Vnd};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::vnpay::{
    signer::{gateway_timezone, hmac_sha512_hex, sign_data, GATEWAY_TIME_FORMAT},
    TxnRef,
};

pub const VNP_SECURE_HASH: &str = "vnp_SecureHash";
pub const VNP_SECURE_HASH_TYPE: &str = "vnp_SecureHashType";
/// The gateway's "transaction approved" code, used for both `vnp_ResponseCode` and
/// `vnp_TransactionStatus`.
pub const VNP_RESPONSE_SUCCESS: &str = "00";

/// The raw parameter set of an inbound gateway callback (return leg or IPN leg).
///
/// Holds every parameter the gateway sent, including ones this engine doesn't know about; they
/// all participate in signature verification, so a forwarding proxy that injects parameters
/// breaks the signature rather than sneaking past it.
#[derive(Debug, Clone, Default)]
pub struct CallbackData {
    params: BTreeMap<String, String>,
}

impl CallbackData {
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { params: params.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Parses a raw query string (`a=1&b=2`, percent-encoded) into callback data. Pairs that
    /// don't decode cleanly are dropped.
    pub fn from_query_string(query: &str) -> Self {
        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                let k = urlencoding::decode(k).ok()?;
                let v = urlencoding::decode(v).ok()?;
                Some((k.into_owned(), v.into_owned()))
            })
            .collect();
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Recomputes the signature over every non-empty parameter except the hash fields and
    /// compares it (case-insensitively) against the supplied `vnp_SecureHash`.
    ///
    /// This never fails: a missing or wrong hash yields `signature_valid == false` in the result.
    /// Repeated verification of the same callback is idempotent by construction.
    pub fn verify(&self, secret: &Secret<String>) -> CallbackResult {
        let signature_valid = match self.get(VNP_SECURE_HASH) {
            Some(supplied) if !supplied.is_empty() => {
                let expected = hmac_sha512_hex(secret, &sign_data(&self.params));
                expected.eq_ignore_ascii_case(supplied)
            },
            _ => {
                warn!("🔐️ Gateway callback arrived without a secure hash");
                false
            },
        };
        CallbackResult {
            signature_valid,
            txn_ref: self.get("vnp_TxnRef").map(|s| s.to_string().into()),
            amount: self.parse_amount(),
            response_code: self.get("vnp_ResponseCode").map(String::from),
            transaction_no: self.get("vnp_TransactionNo").map(String::from),
            transaction_status: self.get("vnp_TransactionStatus").map(String::from),
            bank_code: self.get("vnp_BankCode").map(String::from),
            order_info: self.get("vnp_OrderInfo").map(String::from),
            tmn_code: self.get("vnp_TmnCode").map(String::from),
            currency_code: self.get("vnp_CurrCode").map(String::from),
            pay_date: self.parse_pay_date(),
        }
    }

    fn parse_amount(&self) -> Option<Vnd> {
        let raw = self.get("vnp_Amount")?;
        match raw.parse::<i64>().map_err(|e| e.to_string()).and_then(|minor| {
            Vnd::from_gateway_amount(minor).map_err(|e| e.to_string())
        }) {
            Ok(amount) => Some(amount),
            Err(e) => {
                warn!("🔐️ Gateway callback carried an unparseable amount {raw:?}: {e}");
                None
            },
        }
    }

    fn parse_pay_date(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.get("vnp_PayDate")?;
        let naive = NaiveDateTime::parse_from_str(raw, GATEWAY_TIME_FORMAT).ok()?;
        naive.and_local_timezone(gateway_timezone()).single()
    }
}

/// The outcome of verifying one gateway callback: the decoded fields plus the signature verdict.
///
/// `signature_valid == false` is an expected, adversarial-input outcome, not an error. Callers
/// log it and answer the gateway with a rejection code; they never crash the request pipeline
/// over it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackResult {
    pub signature_valid: bool,
    pub txn_ref: Option<TxnRef>,
    /// The amount in Dong, already divided back down from the gateway's ×100 representation.
    /// `None` when the field is missing or malformed.
    pub amount: Option<Vnd>,
    pub response_code: Option<String>,
    pub transaction_no: Option<String>,
    pub transaction_status: Option<String>,
    pub bank_code: Option<String>,
    pub order_info: Option<String>,
    pub tmn_code: Option<String>,
    pub currency_code: Option<String>,
    pub pay_date: Option<DateTime<FixedOffset>>,
}

impl CallbackResult {
    /// True when the signature holds AND the gateway reports the transaction as approved on both
    /// the response and the settlement status fields.
    pub fn is_successful(&self) -> bool {
        self.signature_valid
            && self.response_code.as_deref() == Some(VNP_RESPONSE_SUCCESS)
            && self.transaction_status.as_deref() == Some(VNP_RESPONSE_SUCCESS)
    }
}
