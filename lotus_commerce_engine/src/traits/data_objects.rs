use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use lcp_common::{Vnd, VND_CURRENCY_CODE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vnpay::TxnRef;

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// Newly created; the customer has been redirected to the gateway but no IPN has arrived.
    New,
    /// The gateway confirmed payment in full.
    Paid,
    /// The gateway reported the payment as declined or abandoned.
    Cancelled,
    /// The payment window lapsed without a gateway confirmation.
    Expired,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::New => write!(f, "New"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
            OrderStatusType::Expired => write!(f, "Expired"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(Self::New),
            "Paid" => Ok(Self::Paid),
            "Cancelled" => Ok(Self::Cancelled),
            "Expired" => Ok(Self::Expired),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub txn_ref: TxnRef,
    pub customer_id: String,
    pub order_info: String,
    pub total_price: Vnd,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: OrderStatusType,
    /// The gateway's own transaction number, recorded when the IPN confirms payment.
    pub gateway_txn_no: Option<String>,
}

//--------------------------------------       NewOrder      ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// The merchant transaction reference the gateway will echo back.
    pub txn_ref: TxnRef,
    pub customer_id: String,
    pub order_info: String,
    pub total_price: Vnd,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(txn_ref: TxnRef, customer_id: String, total_price: Vnd) -> Self {
        Self {
            txn_ref,
            customer_id,
            order_info: String::new(),
            total_price,
            currency: VND_CURRENCY_CODE.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn with_order_info<S: Into<String>>(mut self, order_info: S) -> Self {
        self.order_info = order_info.into();
        self
    }
}

//--------------------------------------   CustomerAccount   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAccount {
    pub id: i64,
    pub username: String,
    pub display_name: String,
}
