use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use lotus_commerce_engine::{
    paging::{FilterOperator, PagedQuery, PropertyFilter, SqlDialect},
    traits::ExecutorError,
    ListApi,
};
use serde_json::json;

use super::mocks::*;
use crate::{
    data_objects::PagedResult,
    middleware::{AclMiddlewareFactory, JwtMiddlewareFactory},
    routes::{admin_list, PERM_REPORT_VIEW},
};

fn configure_app(executor: MockExecutor) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ListApi::new(SqlDialect::MySql, executor))).service(
            web::scope("/api")
                .wrap(JwtMiddlewareFactory::new(test_auth_config().jwt_secret.clone()))
                .service(
                    web::resource("/admin/list")
                        .wrap(AclMiddlewareFactory::new(&[PERM_REPORT_VIEW]))
                        .route(web::post().to(admin_list::<MockExecutor>)),
                ),
        );
    }
}

async fn post_list(executor: MockExecutor, permissions: &[&str], query: &PagedQuery) -> (StatusCode, String) {
    let _ = env_logger::try_init().ok();
    let app = App::new().configure(configure_app(executor));
    let app = test::init_service(app).await;
    let token = access_token(&test_auth_config(), permissions);
    let req = TestRequest::post()
        .uri("/api/admin/list")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(query)
        .to_request();
    match test::try_call_service(&app, req).await {
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

fn product_query() -> PagedQuery {
    PagedQuery::new("products", vec!["id", "name", "price"]).with_primary_keys(vec!["id"])
}

#[actix_web::test]
async fn list_runs_count_and_page_queries() {
    let mut executor = MockExecutor::new();
    executor.expect_fetch_count().returning(|sql, _| {
        assert!(sql.starts_with("SELECT COUNT(*) FROM `products`"), "was: {sql}");
        Ok(42)
    });
    executor.expect_fetch_rows().returning(|sql, _| {
        assert!(sql.contains("ORDER BY `id` ASC"), "was: {sql}");
        Ok(vec![json!({"id": 1, "name": "Rose serum", "price": 450000})])
    });
    let (status, body) = post_list(executor, &[PERM_REPORT_VIEW], &product_query()).await;
    assert!(status.is_success(), "was: {body}");
    let result: PagedResult = serde_json::from_str(&body).expect("invalid list response");
    assert_eq!(result.total, 42);
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0]["name"], json!("Rose serum"));
}

#[actix_web::test]
async fn undeclared_filter_fields_are_a_400_not_a_500() {
    let query = product_query()
        .with_filter(PropertyFilter::new("is_admin; --", FilterOperator::Eq, true));
    let (status, body) = post_list(MockExecutor::new(), &[PERM_REPORT_VIEW], &query).await;
    assert_eq!(status.as_u16(), StatusCode::BAD_REQUEST.as_u16());
    assert!(body.contains("Unknown filter field"), "was: {body}");
}

#[actix_web::test]
async fn broken_metadata_is_a_500() {
    let query = PagedQuery::new("products", Vec::<String>::new());
    let (status, body) = post_list(MockExecutor::new(), &[PERM_REPORT_VIEW], &query).await;
    assert_eq!(status.as_u16(), StatusCode::INTERNAL_SERVER_ERROR.as_u16());
    assert!(body.contains("Invalid list query"), "was: {body}");
}

#[actix_web::test]
async fn listing_requires_the_report_view_permission() {
    let (status, body) = post_list(MockExecutor::new(), &["PRODUCT.VIEW"], &product_query()).await;
    assert_eq!(status.as_u16(), StatusCode::FORBIDDEN.as_u16());
    assert!(body.contains("Insufficient Permissions"), "was: {body}");
}

#[actix_web::test]
async fn an_executorless_backend_reports_a_configuration_error() {
    let mut executor = MockExecutor::new();
    executor.expect_fetch_count().returning(|_, _| Err(ExecutorError::Unsupported));
    let (status, body) = post_list(executor, &[PERM_REPORT_VIEW], &product_query()).await;
    assert_eq!(status.as_u16(), StatusCode::INTERNAL_SERVER_ERROR.as_u16());
    assert!(body.contains("does not execute raw SQL"), "was: {body}");
}
