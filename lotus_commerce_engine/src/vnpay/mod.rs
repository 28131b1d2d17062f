//! # VNPay payment URL signing and callback verification
//!
//! The checkout flow hands the customer's browser a redirect URL into the VNPay gateway. That URL
//! carries the order parameters plus an HMAC-SHA512 signature over them, keyed with the merchant's
//! shared secret. After the customer pays, the gateway calls back twice: once via the browser
//! (the return leg) and once server-to-server (the IPN leg). Both callbacks carry the same kind of
//! signature and MUST be verified before any order state changes.
//!
//! ## Canonical sign string
//!
//! Both directions use the same canonicalisation, implemented once in [`signer`]:
//! parameters sorted by name (byte order), empty values and the `vnp_SecureHash` /
//! `vnp_SecureHashType` fields dropped, values URL-encoded, pairs joined as `key=value&...`.
//! Because build and verify share this routine, a URL built by [`signer::create_payment_url`]
//! re-verifies through [`CallbackData::verify`].
//!
//! ## Adversarial input
//!
//! The IPN endpoint is public; anyone can POST noise at it. Verification therefore never returns
//! an error for a bad signature: [`CallbackResult::signature_valid`] is a plain boolean and the
//! caller decides how to answer the gateway.
//!
//! Amounts on the wire are in minor units (×100): an order of 150,000 ₫ travels as `15000000`.
//! Timestamps are in the gateway's timezone (GMT+7), not UTC and not server-local.

mod callback;
mod config;
mod request;
pub mod signer;

pub use callback::{CallbackData, CallbackResult, VNP_SECURE_HASH, VNP_SECURE_HASH_TYPE};
pub use config::VnPayConfig;
pub use request::{PaymentRequest, TxnRef};
pub use signer::{create_payment_url, PaymentUrlError};
