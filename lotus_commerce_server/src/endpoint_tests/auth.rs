use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use log::*;
use lotus_commerce_engine::{traits::AuthApiError, AuthApi};

use super::mocks::*;
use crate::{
    auth::{validate_token, TokenIssuer},
    config::AuthConfig,
    data_objects::{LoginRequest, LoginResponse},
    routes::login,
};

fn configure_app(config: AuthConfig, auth_manager: MockAuthManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AuthApi::new(auth_manager)))
            .app_data(web::Data::new(TokenIssuer::new(&config)))
            .service(web::resource("/auth").route(web::post().to(login::<MockAuthManager>)));
    }
}

async fn post_login(auth_manager: MockAuthManager, request: &LoginRequest) -> (StatusCode, String, AuthConfig) {
    let _ = env_logger::try_init().ok();
    let config = test_auth_config();
    let app = App::new().configure(configure_app(config.clone(), auth_manager));
    let app = test::init_service(app).await;
    let req = TestRequest::post().uri("/auth").set_json(request).to_request();
    let (_, res) = test::call_service(&app, req).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body, config)
}

#[actix_web::test]
async fn login_with_valid_credentials_issues_a_permission_bearing_token() {
    let mut auth_manager = MockAuthManager::new();
    auth_manager.expect_verify_credentials().returning(|username, _| {
        Ok(lotus_commerce_engine::traits::CustomerAccount {
            id: 7,
            username: username.to_string(),
            display_name: "Mai".to_string(),
        })
    });
    auth_manager
        .expect_permissions_for_account()
        .returning(|_| Ok(vec!["PRODUCT.VIEW".to_string(), "ORDER.CREATE".to_string()]));
    let request = LoginRequest { username: "mai".to_string(), password: "s3cret".to_string() };
    let (status, body, config) = post_login(auth_manager, &request).await;
    info!("Response body: {body}");
    assert!(status.is_success());
    let response: LoginResponse = serde_json::from_str(&body).expect("invalid login response");
    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.display_name, "Mai");
    // The token round-trips and the compressed claim expands to the granted set.
    let claims = validate_token(&response.access_token, &config.jwt_secret).unwrap();
    assert_eq!(claims.sub, "7");
    let permissions = claims.permission_set();
    assert!(permissions.contains("PRODUCT.VIEW"));
    assert!(permissions.contains("ORDER.CREATE"));
    assert_eq!(permissions.len(), 2);
}

#[actix_web::test]
async fn login_with_bad_credentials_is_a_401_with_no_detail() {
    let mut auth_manager = MockAuthManager::new();
    auth_manager
        .expect_verify_credentials()
        .returning(|_, _| Err(AuthApiError::InvalidCredentials));
    let request = LoginRequest { username: "mai".to_string(), password: "wrong".to_string() };
    let (status, body, _) = post_login(auth_manager, &request).await;
    assert_eq!(status.as_u16(), StatusCode::UNAUTHORIZED.as_u16());
    assert_eq!(body, r#"{"error":"Invalid username or password"}"#);
}

#[actix_web::test]
async fn login_with_unknown_account_reads_the_same_as_a_bad_password() {
    let mut auth_manager = MockAuthManager::new();
    auth_manager
        .expect_verify_credentials()
        .returning(|_, _| Err(AuthApiError::AccountNotFound));
    let request = LoginRequest { username: "ghost".to_string(), password: "pw".to_string() };
    let (status, body, _) = post_login(auth_manager, &request).await;
    assert_eq!(status.as_u16(), StatusCode::UNAUTHORIZED.as_u16());
    assert_eq!(body, r#"{"error":"Invalid username or password"}"#);
}

#[actix_web::test]
async fn backend_failures_surface_as_500() {
    let mut auth_manager = MockAuthManager::new();
    auth_manager
        .expect_verify_credentials()
        .returning(|_, _| Err(AuthApiError::DatabaseError("connection refused".to_string())));
    let request = LoginRequest { username: "mai".to_string(), password: "pw".to_string() };
    let (status, body, _) = post_login(auth_manager, &request).await;
    assert_eq!(status.as_u16(), StatusCode::INTERNAL_SERVER_ERROR.as_u16());
    assert!(body.contains("An error occurred on the backend of the server."), "was: {body}");
}
