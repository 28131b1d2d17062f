use std::net::IpAddr;

use lcp_common::Vnd;
use log::{info, warn};
use thiserror::Error;

use crate::{
    traits::{NewOrder, Order, OrderApiError, OrderManagement, OrderStatusType},
    vnpay::{create_payment_url, CallbackData, PaymentRequest, PaymentUrlError, TxnRef, VnPayConfig},
};

#[derive(Debug, Error)]
pub enum PaymentApiError {
    #[error("Order storage error. {0}")]
    OrderError(#[from] OrderApiError),
    #[error("Could not build payment URL. {0}")]
    UrlError(#[from] PaymentUrlError),
}

/// The decision the IPN handler reports back to the gateway. The HTTP layer maps each variant
/// onto the gateway's `RspCode` contract; getting that mapping wrong means the gateway retries
/// the notification indefinitely.
#[derive(Debug, Clone)]
pub enum IpnOutcome {
    /// Signature valid, order found, amounts match, payment approved; the order is now `Paid`.
    Confirmed(Order),
    /// Signature valid and the order matched, but the gateway reports the payment as declined or
    /// abandoned; the order is now `Cancelled`. Still an acknowledged notification.
    PaymentFailed { order: Order, response_code: String },
    /// The recomputed HMAC does not match the supplied hash. Nothing was read or written.
    InvalidSignature,
    /// No order corresponds to the callback's transaction reference.
    OrderNotFound(TxnRef),
    /// The signed amount disagrees with the recorded order total.
    AmountMismatch { txn_ref: TxnRef, expected: Vnd, actual: Option<Vnd> },
    /// The order already left the `New` state; a duplicate or late notification.
    AlreadyConfirmed(Order),
    /// The order store failed; the gateway should retry later.
    BackendError(String),
}

impl IpnOutcome {
    /// The gateway's acknowledgement code for this outcome.
    pub fn rsp_code(&self) -> &'static str {
        match self {
            IpnOutcome::Confirmed(_) | IpnOutcome::PaymentFailed { .. } => "00",
            IpnOutcome::OrderNotFound(_) => "01",
            IpnOutcome::AlreadyConfirmed(_) => "02",
            IpnOutcome::AmountMismatch { .. } => "04",
            IpnOutcome::InvalidSignature => "97",
            IpnOutcome::BackendError(_) => "99",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            IpnOutcome::Confirmed(_) | IpnOutcome::PaymentFailed { .. } => "Confirm Success",
            IpnOutcome::OrderNotFound(_) => "Order not found",
            IpnOutcome::AlreadyConfirmed(_) => "Order already confirmed",
            IpnOutcome::AmountMismatch { .. } => "Invalid amount",
            IpnOutcome::InvalidSignature => "Invalid signature",
            IpnOutcome::BackendError(_) => "Unknown error",
        }
    }
}

/// Drives the two payment flows: building the signed redirect at checkout, and deciding what an
/// inbound IPN means for the order record.
#[derive(Debug, Clone)]
pub struct PaymentApi<B> {
    config: VnPayConfig,
    db: B,
}

impl<B> PaymentApi<B>
where B: OrderManagement
{
    pub fn new(config: VnPayConfig, db: B) -> Self {
        Self { config, db }
    }

    pub fn config(&self) -> &VnPayConfig {
        &self.config
    }

    /// Creates the order record and the signed gateway URL for one checkout attempt.
    pub async fn create_checkout(
        &self,
        customer_id: String,
        amount: Vnd,
        order_info: String,
        order_type: Option<String>,
        bank_code: Option<String>,
        locale: Option<String>,
        ip_address: IpAddr,
    ) -> Result<(Order, String), PaymentApiError> {
        let txn_ref = TxnRef::generate();
        let new_order =
            NewOrder::new(txn_ref, customer_id, amount).with_order_info(order_info.clone());
        let order = self.db.insert_order(new_order).await?;
        let mut request =
            PaymentRequest::new(order.txn_ref.clone(), amount, order_info, ip_address)
                .with_created_at(order.created_at);
        if let Some(order_type) = order_type {
            request = request.with_order_type(order_type);
        }
        if let Some(bank_code) = bank_code {
            request = request.with_bank_code(bank_code);
        }
        if let Some(locale) = locale {
            request = request.with_locale(locale);
        }
        let url = create_payment_url(&self.config, &request)?;
        info!("📝️ Order [{}] created for {}; redirecting customer to the gateway", order.txn_ref, order.total_price);
        Ok((order, url))
    }

    /// Verifies an inbound IPN and applies it to the order record.
    ///
    /// Never returns an error: every failure mode is a structured outcome, because the caller
    /// must answer the gateway with an acknowledgement code either way. Re-delivering the same
    /// notification is safe; the second delivery lands in [`IpnOutcome::AlreadyConfirmed`].
    pub async fn process_ipn(&self, callback: CallbackData) -> IpnOutcome {
        let result = callback.verify(&self.config.hash_secret);
        if !result.signature_valid {
            warn!("🔐️ IPN rejected: signature did not verify");
            return IpnOutcome::InvalidSignature;
        }
        let Some(txn_ref) = result.txn_ref.clone() else {
            warn!("🔐️ IPN carried a valid signature but no transaction reference");
            return IpnOutcome::InvalidSignature;
        };
        let order = match self.db.fetch_order_by_txn_ref(&txn_ref).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                warn!("📝️ IPN for unknown order {txn_ref}");
                return IpnOutcome::OrderNotFound(txn_ref);
            },
            Err(e) => {
                warn!("📝️ IPN for {txn_ref} could not be processed: {e}");
                return IpnOutcome::BackendError(e.to_string());
            },
        };
        if result.amount != Some(order.total_price) {
            warn!(
                "📝️ IPN amount mismatch on {txn_ref}: recorded {} but gateway signed {:?}",
                order.total_price, result.amount
            );
            return IpnOutcome::AmountMismatch {
                txn_ref,
                expected: order.total_price,
                actual: result.amount,
            };
        }
        if order.status != OrderStatusType::New {
            return IpnOutcome::AlreadyConfirmed(order);
        }
        if result.is_successful() {
            match self
                .db
                .update_order_status(&txn_ref, OrderStatusType::Paid, result.transaction_no.clone())
                .await
            {
                Ok(order) => {
                    info!("📝️ Order [{txn_ref}] confirmed as paid by the gateway");
                    IpnOutcome::Confirmed(order)
                },
                Err(e) => IpnOutcome::BackendError(e.to_string()),
            }
        } else {
            let response_code = result.response_code.clone().unwrap_or_default();
            match self.db.update_order_status(&txn_ref, OrderStatusType::Cancelled, None).await {
                Ok(order) => {
                    info!("📝️ Order [{txn_ref}] reported as failed by the gateway (code {response_code})");
                    IpnOutcome::PaymentFailed { order, response_code }
                },
                Err(e) => IpnOutcome::BackendError(e.to_string()),
            }
        }
    }
}
