//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module
//! neat and tidy 🙏
//!
//! Handlers are generic over the backend traits rather than a concrete store, so the endpoint
//! tests can drive them with mocks and deployments can wire in whatever adapter they run on.

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr},
};

use actix_web::{get, web, HttpMessage, HttpRequest, HttpResponse, Responder};
use log::*;
use lotus_commerce_engine::{
    paging::PagedQuery,
    traits::{AuthManagement, OrderManagement, SqlExecutor},
    vnpay::{CallbackData, VnPayConfig},
    AuthApi,
    ListApi,
    PaymentApi,
};

use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::ServerOptions,
    data_objects::{
        CheckoutRequest,
        CheckoutResponse,
        IpnResponse,
        LoginRequest,
        LoginResponse,
        PagedResult,
        ReturnSummary,
    },
    errors::ServerError,
    helpers::get_remote_ip,
};

/// The permission a customer needs to start a checkout.
pub const PERM_ORDER_CREATE: &str = "ORDER.CREATE";
/// The permission an admin needs to run the generic list queries.
pub const PERM_REPORT_VIEW: &str = "REPORT.VIEW";

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
/// Route handler for the login endpoint.
///
/// Exchanges a username and password for a signed access token. The user's permission codes are
/// fetched once, compressed into a single claim, and embedded in the token; they are re-read only
/// at the next login or refresh, never mid-token.
pub async fn login<B: AuthManagement + 'static>(
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<B>>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let LoginRequest { username, password } = body.into_inner();
    let (account, permission_claim) = api.login(&username, &password).await?;
    let access_token = issuer.issue_token(&account, vec![permission_claim])?;
    debug!("🔑️ Issued access token for {}", account.username);
    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        display_name: account.display_name,
    }))
}

//----------------------------------------------   Checkout  ----------------------------------------------------
/// Route handler for starting a payment.
///
/// Creates the order record and answers with the signed gateway redirect URL. The caller's IP is
/// part of the signed parameters, so proxies must be configured (see
/// [`crate::config::ServerConfig`]) for the forwarding headers to be trusted.
pub async fn checkout<B: OrderManagement + 'static>(
    req: HttpRequest,
    body: web::Json<CheckoutRequest>,
    api: web::Data<PaymentApi<B>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let claims = req
        .extensions()
        .get::<JwtClaims>()
        .cloned()
        .ok_or_else(|| ServerError::Unspecified("No JWT claims found in request extensions".into()))?;
    let ip_address = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded)
        .unwrap_or_else(|| {
            warn!("🏦️ Could not determine the customer's IP address. Using loopback.");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        });
    let CheckoutRequest { amount, order_info, order_type, bank_code, locale } = body.into_inner();
    let (order, payment_url) = api
        .create_checkout(claims.sub.clone(), amount, order_info, order_type, bank_code, locale, ip_address)
        .await?;
    Ok(HttpResponse::Ok().json(CheckoutResponse {
        txn_ref: order.txn_ref.as_str().to_string(),
        payment_url,
    }))
}

//----------------------------------------------   VNPay callbacks  -----------------------------------------------
/// Route handler for the gateway's server-to-server payment notification.
///
/// This endpoint is public and adversarial input is expected, so it never errors: every outcome,
/// including a forged signature, is answered with HTTP 200 and the gateway's documented
/// `RspCode` body. Anything else makes the gateway retry the notification indefinitely.
pub async fn vnpay_ipn<B: OrderManagement + 'static>(
    query: web::Query<HashMap<String, String>>,
    api: web::Data<PaymentApi<B>>,
) -> impl Responder {
    let callback = CallbackData::from_params(query.into_inner());
    let outcome = api.process_ipn(callback).await;
    info!("🏦️ IPN processed: RspCode {} ({})", outcome.rsp_code(), outcome.message());
    HttpResponse::Ok().json(IpnResponse::from(&outcome))
}

/// Route handler for the browser return leg.
///
/// Verifies the signature and summarises the result for the frontend. Order state is NOT changed
/// here; the IPN is the authoritative notification and the two legs race each other.
pub async fn vnpay_return(
    query: web::Query<HashMap<String, String>>,
    config: web::Data<VnPayConfig>,
) -> impl Responder {
    let result = CallbackData::from_params(query.into_inner()).verify(&config.hash_secret);
    if !result.signature_valid {
        warn!("🔐️ Return-leg callback failed signature verification");
    }
    HttpResponse::Ok().json(ReturnSummary::from(result))
}

//----------------------------------------------   Admin lists  ---------------------------------------------------
/// Route handler for the back office's generic list queries.
///
/// The request names a table, its columns and the filter/sort/page choices; the engine builds
/// the count + page SQL and runs both through the backend's raw-SQL boundary. Undeclared filter
/// fields are rejected as a 400 before any SQL text exists.
pub async fn admin_list<B: SqlExecutor + 'static>(
    body: web::Json<PagedQuery>,
    api: web::Data<ListApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = body.into_inner();
    let (total, rows) = api.fetch_page(&query).await?;
    debug!("📄️ List query on {} returned {} of {total} rows", query.table, rows.len());
    Ok(HttpResponse::Ok().json(PagedResult { total, rows }))
}
