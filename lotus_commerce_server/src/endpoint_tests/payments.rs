use std::collections::BTreeMap;

use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use lcp_common::Vnd;
use lotus_commerce_engine::{
    traits::OrderStatusType,
    vnpay::{
        signer::{hmac_sha512_hex, sign_data},
        CallbackData,
        VNP_SECURE_HASH,
    },
    PaymentApi,
};

use super::mocks::*;
use crate::{
    config::{AuthConfig, ServerOptions},
    data_objects::{CheckoutRequest, CheckoutResponse},
    middleware::{AclMiddlewareFactory, JwtMiddlewareFactory},
    routes::{checkout, vnpay_ipn, PERM_ORDER_CREATE},
};

fn configure_app(
    auth_config: AuthConfig,
    order_manager: MockOrderManager,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(PaymentApi::new(test_vnp_config(), order_manager)))
            .app_data(web::Data::new(ServerOptions { use_x_forwarded_for: false, use_forwarded: false }))
            .service(
                web::scope("/api").wrap(JwtMiddlewareFactory::new(auth_config.jwt_secret.clone())).service(
                    web::resource("/checkout")
                        .wrap(AclMiddlewareFactory::new(&[PERM_ORDER_CREATE]))
                        .route(web::post().to(checkout::<MockOrderManager>)),
                ),
            )
            .service(
                web::scope("/payment/vnpay")
                    .service(web::resource("/ipn").route(web::get().to(vnpay_ipn::<MockOrderManager>))),
            );
    }
}

async fn call(order_manager: MockOrderManager, req: TestRequest) -> (StatusCode, String) {
    let _ = env_logger::try_init().ok();
    let app = App::new().configure(configure_app(test_auth_config(), order_manager));
    let app = test::init_service(app).await;
    match test::try_call_service(&app, req.to_request()).await {
        Ok(res) => {
            let (_, res) = res.into_parts();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
            (status, body)
        },
        // A middleware that rejects the request returns `Err`; in production the HTTP dispatcher
        // renders it via `ResponseError`. Reproduce that rendering so the test observes the same
        // status and body it would over the wire.
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
            (status, body)
        },
    }
}

fn checkout_request() -> CheckoutRequest {
    CheckoutRequest {
        amount: Vnd::from(150_000),
        order_info: "Thanh toan don hang".to_string(),
        order_type: None,
        bank_code: None,
        locale: None,
    }
}

//----------------------------------------------   Checkout  ----------------------------------------------------

#[actix_web::test]
async fn checkout_without_a_token_is_unauthorized() {
    let req = TestRequest::post().uri("/api/checkout").set_json(checkout_request());
    let (status, body) = call(MockOrderManager::new(), req).await;
    assert_eq!(status.as_u16(), StatusCode::UNAUTHORIZED.as_u16());
    assert!(body.contains("No access token provided"), "was: {body}");
}

#[actix_web::test]
async fn checkout_with_a_garbage_token_is_unauthorized() {
    let req = TestRequest::post()
        .uri("/api/checkout")
        .insert_header(("Authorization", "Bearer made.up.nonsense"))
        .set_json(checkout_request());
    let (status, body) = call(MockOrderManager::new(), req).await;
    assert_eq!(status.as_u16(), StatusCode::UNAUTHORIZED.as_u16());
    assert!(body.contains("Access token is invalid."), "was: {body}");
}

#[actix_web::test]
async fn checkout_without_the_order_create_permission_is_forbidden() {
    let token = access_token(&test_auth_config(), &["PRODUCT.VIEW"]);
    let req = TestRequest::post()
        .uri("/api/checkout")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(checkout_request());
    let (status, body) = call(MockOrderManager::new(), req).await;
    assert_eq!(status.as_u16(), StatusCode::FORBIDDEN.as_u16());
    assert!(body.contains("Insufficient Permissions"), "was: {body}");
}

#[actix_web::test]
async fn checkout_creates_the_order_and_a_verifiable_payment_url() {
    let mut order_manager = MockOrderManager::new();
    order_manager.expect_insert_order().returning(|order| {
        Ok(lotus_commerce_engine::traits::Order {
            id: 1,
            txn_ref: order.txn_ref,
            customer_id: order.customer_id,
            order_info: order.order_info,
            total_price: order.total_price,
            currency: order.currency,
            created_at: order.created_at,
            updated_at: order.created_at,
            status: OrderStatusType::New,
            gateway_txn_no: None,
        })
    });
    let token = access_token(&test_auth_config(), &[PERM_ORDER_CREATE]);
    let req = TestRequest::post()
        .uri("/api/checkout")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(checkout_request());
    let (status, body) = call(order_manager, req).await;
    assert!(status.is_success(), "was: {body}");
    let response: CheckoutResponse = serde_json::from_str(&body).expect("invalid checkout response");
    assert!(response.payment_url.contains("vnp_Amount=15000000"));
    assert!(response.payment_url.contains(&format!("vnp_TxnRef={}", response.txn_ref)));
    // The URL we hand out must pass our own verification: parse the query back and re-check it.
    let query = response.payment_url.split_once('?').unwrap().1;
    let result = CallbackData::from_query_string(query).verify(&test_vnp_config().hash_secret);
    assert!(result.signature_valid);
    assert_eq!(result.amount, Some(Vnd::from(150_000)));
}

//----------------------------------------------   IPN  ----------------------------------------------------

/// A percent-encoded, signed IPN query string for the given order parameters.
fn signed_ipn_query(tweak: impl FnOnce(&mut BTreeMap<String, String>)) -> String {
    let config = test_vnp_config();
    let mut params = BTreeMap::new();
    params.insert("vnp_TmnCode".to_string(), config.tmn_code.clone());
    params.insert("vnp_TxnRef".to_string(), "17254000000001a2f".to_string());
    params.insert("vnp_Amount".to_string(), "15000000".to_string());
    params.insert("vnp_ResponseCode".to_string(), "00".to_string());
    params.insert("vnp_TransactionStatus".to_string(), "00".to_string());
    params.insert("vnp_TransactionNo".to_string(), "14422574".to_string());
    tweak(&mut params);
    let query = sign_data(&params);
    let digest = hmac_sha512_hex(&config.hash_secret, &query);
    format!("{query}&{VNP_SECURE_HASH}={digest}")
}

#[actix_web::test]
async fn valid_ipn_confirms_the_order() {
    let mut order_manager = MockOrderManager::new();
    order_manager
        .expect_fetch_order_by_txn_ref()
        .returning(|txn_ref| Ok(Some(sample_order(txn_ref.as_str(), 150_000, OrderStatusType::New))));
    order_manager.expect_update_order_status().returning(|txn_ref, status, gateway_txn_no| {
        let mut order = sample_order(txn_ref.as_str(), 150_000, status);
        order.gateway_txn_no = gateway_txn_no;
        Ok(order)
    });
    let uri = format!("/payment/vnpay/ipn?{}", signed_ipn_query(|_| {}));
    let (status, body) = call(order_manager, TestRequest::get().uri(&uri)).await;
    assert!(status.is_success());
    assert_eq!(body, r#"{"RspCode":"00","Message":"Confirm Success"}"#);
}

#[actix_web::test]
async fn forged_ipn_is_acknowledged_with_rsp_code_97() {
    // No expectations on the mock: a bad signature must short-circuit before any storage access.
    let corrupted = signed_ipn_query(|_| {}).replace("vnp_SecureHash=", "vnp_SecureHash=0000");
    let uri = format!("/payment/vnpay/ipn?{corrupted}");
    let (status, body) = call(MockOrderManager::new(), TestRequest::get().uri(&uri)).await;
    assert!(status.is_success());
    assert_eq!(body, r#"{"RspCode":"97","Message":"Invalid signature"}"#);
}

#[actix_web::test]
async fn ipn_for_an_unknown_order_is_rsp_code_01() {
    let mut order_manager = MockOrderManager::new();
    order_manager.expect_fetch_order_by_txn_ref().returning(|_| Ok(None));
    let uri = format!("/payment/vnpay/ipn?{}", signed_ipn_query(|_| {}));
    let (status, body) = call(order_manager, TestRequest::get().uri(&uri)).await;
    assert!(status.is_success());
    assert_eq!(body, r#"{"RspCode":"01","Message":"Order not found"}"#);
}

#[actix_web::test]
async fn ipn_with_a_mismatched_amount_is_rsp_code_04() {
    // The signature is valid over 15000000, but the recorded order total is different.
    let mut order_manager = MockOrderManager::new();
    order_manager
        .expect_fetch_order_by_txn_ref()
        .returning(|txn_ref| Ok(Some(sample_order(txn_ref.as_str(), 140_000, OrderStatusType::New))));
    let uri = format!("/payment/vnpay/ipn?{}", signed_ipn_query(|_| {}));
    let (status, body) = call(order_manager, TestRequest::get().uri(&uri)).await;
    assert!(status.is_success());
    assert_eq!(body, r#"{"RspCode":"04","Message":"Invalid amount"}"#);
}

#[actix_web::test]
async fn replayed_ipn_is_rsp_code_02() {
    let mut order_manager = MockOrderManager::new();
    order_manager
        .expect_fetch_order_by_txn_ref()
        .returning(|txn_ref| Ok(Some(sample_order(txn_ref.as_str(), 150_000, OrderStatusType::Paid))));
    let uri = format!("/payment/vnpay/ipn?{}", signed_ipn_query(|_| {}));
    let (status, body) = call(order_manager, TestRequest::get().uri(&uri)).await;
    assert!(status.is_success());
    assert_eq!(body, r#"{"RspCode":"02","Message":"Order already confirmed"}"#);
}

#[actix_web::test]
async fn declined_payment_is_still_acknowledged_and_cancels_the_order() {
    let mut order_manager = MockOrderManager::new();
    order_manager
        .expect_fetch_order_by_txn_ref()
        .returning(|txn_ref| Ok(Some(sample_order(txn_ref.as_str(), 150_000, OrderStatusType::New))));
    order_manager.expect_update_order_status().returning(|txn_ref, status, _| {
        assert_eq!(status, OrderStatusType::Cancelled);
        Ok(sample_order(txn_ref.as_str(), 150_000, status))
    });
    let uri = format!(
        "/payment/vnpay/ipn?{}",
        signed_ipn_query(|p| {
            p.insert("vnp_ResponseCode".to_string(), "24".to_string());
            p.insert("vnp_TransactionStatus".to_string(), "02".to_string());
        })
    );
    let (status, body) = call(order_manager, TestRequest::get().uri(&uri)).await;
    assert!(status.is_success());
    assert_eq!(body, r#"{"RspCode":"00","Message":"Confirm Success"}"#);
}
