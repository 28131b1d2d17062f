use chrono::Utc;
use lcp_common::{Secret, Vnd, VND_CURRENCY_CODE};
use lotus_commerce_engine::{
    claims,
    claims::PermissionSet,
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
    vnpay::{TxnRef, VnPayConfig},
};
use mockall::mock;

use crate::{auth::TokenIssuer, config::AuthConfig};

mock! {
    pub AuthManager {}
    impl AuthManagement for AuthManager {
        async fn verify_credentials(&self, username: &str, password: &str) -> Result<CustomerAccount, AuthApiError>;
        async fn permissions_for_account(&self, account_id: i64) -> Result<Vec<String>, AuthApiError>;
    }
}

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;
        async fn fetch_order_by_txn_ref(&self, txn_ref: &TxnRef) -> Result<Option<Order>, OrderApiError>;
        async fn update_order_status(&self, txn_ref: &TxnRef, status: OrderStatusType, gateway_txn_no: Option<String>) -> Result<Order, OrderApiError>;
    }
}

mock! {
    pub Executor {}
    impl SqlExecutor for Executor {
        async fn fetch_rows(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<serde_json::Value>, ExecutorError>;
        async fn fetch_count(&self, sql: &str, params: &[SqlParam]) -> Result<i64, ExecutorError>;
    }
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Secret::new("0123456789abcdef0123456789abcdef".to_string()),
        token_lifetime: chrono::Duration::hours(1),
    }
}

pub fn test_vnp_config() -> VnPayConfig {
    VnPayConfig {
        tmn_code: "LOTUS001".to_string(),
        hash_secret: Secret::new("TESTSECRETKEY123".to_string()),
        return_url: "https://shop.example.com/payment/vnpay/return".to_string(),
        ..VnPayConfig::default()
    }
}

/// An access token for account 7 carrying the given permission codes, signed with the test secret.
pub fn access_token(config: &AuthConfig, permissions: &[&str]) -> String {
    let account =
        CustomerAccount { id: 7, username: "mai".to_string(), display_name: "Mai".to_string() };
    let set: PermissionSet = permissions.iter().copied().collect();
    TokenIssuer::new(config)
        .issue_token(&account, vec![claims::encode(&set)])
        .expect("could not issue test token")
}

pub fn sample_order(txn_ref: &str, price: i64, status: OrderStatusType) -> Order {
    let now = Utc::now();
    Order {
        id: 1,
        txn_ref: TxnRef::from(txn_ref.to_string()),
        customer_id: "7".to_string(),
        order_info: "Thanh toan don hang".to_string(),
        total_price: Vnd::from(price),
        currency: VND_CURRENCY_CODE.to_string(),
        created_at: now,
        updated_at: now,
        status,
        gateway_txn_no: None,
    }
}
