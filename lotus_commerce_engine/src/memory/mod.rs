//! An in-memory backend for development servers and tests.
//!
//! This is NOT a production store: it forgets everything on restart and answers the raw-SQL
//! boundary with [`ExecutorError::Unsupported`] (there is no SQL engine to run against).
//! Deployments bring their own database adapters; everything in the engine is exercised against
//! this backend in tests.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::{
    paging::SqlParam,
    traits::{
        AuthApiError,
        AuthManagement,
        CustomerAccount,
        ExecutorError,
        NewOrder,
        Order,
        OrderApiError,
        OrderManagement,
        OrderStatusType,
        SqlExecutor,
    },
    vnpay::TxnRef,
};

#[derive(Debug)]
struct StoredAccount {
    account: CustomerAccount,
    password_hash: String,
    permissions: Vec<String>,
}

#[derive(Debug, Default)]
struct Inner {
    next_order_id: i64,
    next_account_id: i64,
    orders: HashMap<TxnRef, Order>,
    accounts: Vec<StoredAccount>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    inner: Arc<RwLock<Inner>>,
}

fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account with the given permission codes. Returns the created account record.
    pub fn add_account(
        &self,
        username: &str,
        password: &str,
        permissions: &[&str],
    ) -> CustomerAccount {
        let mut inner = self.inner.write().expect("backend lock poisoned");
        inner.next_account_id += 1;
        let account = CustomerAccount {
            id: inner.next_account_id,
            username: username.to_string(),
            display_name: username.to_string(),
        };
        inner.accounts.push(StoredAccount {
            account: account.clone(),
            password_hash: hash_password(password),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        });
        account
    }
}

impl AuthManagement for InMemoryBackend {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CustomerAccount, AuthApiError> {
        let inner = self.inner.read().expect("backend lock poisoned");
        inner
            .accounts
            .iter()
            .find(|a| a.account.username == username && a.password_hash == hash_password(password))
            .map(|a| a.account.clone())
            .ok_or(AuthApiError::InvalidCredentials)
    }

    async fn permissions_for_account(&self, account_id: i64) -> Result<Vec<String>, AuthApiError> {
        let inner = self.inner.read().expect("backend lock poisoned");
        inner
            .accounts
            .iter()
            .find(|a| a.account.id == account_id)
            .map(|a| a.permissions.clone())
            .ok_or(AuthApiError::AccountNotFound)
    }
}

impl OrderManagement for InMemoryBackend {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let mut inner = self.inner.write().expect("backend lock poisoned");
        if inner.orders.contains_key(&order.txn_ref) {
            return Err(OrderApiError::DuplicateOrder(order.txn_ref));
        }
        inner.next_order_id += 1;
        let record = Order {
            id: inner.next_order_id,
            txn_ref: order.txn_ref.clone(),
            customer_id: order.customer_id,
            order_info: order.order_info,
            total_price: order.total_price,
            currency: order.currency,
            created_at: order.created_at,
            updated_at: order.created_at,
            status: OrderStatusType::New,
            gateway_txn_no: None,
        };
        inner.orders.insert(order.txn_ref, record.clone());
        Ok(record)
    }

    async fn fetch_order_by_txn_ref(&self, txn_ref: &TxnRef) -> Result<Option<Order>, OrderApiError> {
        let inner = self.inner.read().expect("backend lock poisoned");
        Ok(inner.orders.get(txn_ref).cloned())
    }

    async fn update_order_status(
        &self,
        txn_ref: &TxnRef,
        status: OrderStatusType,
        gateway_txn_no: Option<String>,
    ) -> Result<Order, OrderApiError> {
        let mut inner = self.inner.write().expect("backend lock poisoned");
        let order = inner
            .orders
            .get_mut(txn_ref)
            .ok_or_else(|| OrderApiError::OrderNotFound(txn_ref.clone()))?;
        order.status = status;
        order.updated_at = Utc::now();
        if gateway_txn_no.is_some() {
            order.gateway_txn_no = gateway_txn_no;
        }
        Ok(order.clone())
    }
}

impl SqlExecutor for InMemoryBackend {
    async fn fetch_rows(
        &self,
        _sql: &str,
        _params: &[SqlParam],
    ) -> Result<Vec<serde_json::Value>, ExecutorError> {
        Err(ExecutorError::Unsupported)
    }

    async fn fetch_count(&self, _sql: &str, _params: &[SqlParam]) -> Result<i64, ExecutorError> {
        Err(ExecutorError::Unsupported)
    }
}
