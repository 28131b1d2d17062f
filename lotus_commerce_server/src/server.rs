use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use lotus_commerce_engine::{
    traits::{AuthManagement, OrderManagement, SqlExecutor},
    AuthApi,
    ListApi,
    PaymentApi,
};

use crate::{
    auth::TokenIssuer,
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    middleware::{AclMiddlewareFactory, JwtMiddlewareFactory},
    routes::{admin_list, checkout, health, login, vnpay_ipn, vnpay_return, PERM_ORDER_CREATE, PERM_REPORT_VIEW},
};

pub async fn run_server<B>(config: ServerConfig, backend: B) -> Result<(), ServerError>
where B: AuthManagement + OrderManagement + SqlExecutor + Clone + Send + Sync + 'static {
    let srv = create_server_instance(config, backend)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<B>(config: ServerConfig, backend: B) -> Result<Server, ServerError>
where B: AuthManagement + OrderManagement + SqlExecutor + Clone + Send + Sync + 'static {
    let bind_addr = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let auth_api = AuthApi::new(backend.clone());
        let payment_api = PaymentApi::new(config.vnpay.clone(), backend.clone());
        let list_api = ListApi::new(config.sql_dialect, backend.clone());
        let token_issuer = TokenIssuer::new(&config.auth);
        let options = ServerOptions::from_config(&config);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("lcp::access_log"))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(payment_api))
            .app_data(web::Data::new(list_api))
            .app_data(web::Data::new(token_issuer))
            .app_data(web::Data::new(options))
            .app_data(web::Data::new(config.vnpay.clone()))
            .service(health)
            .service(web::resource("/auth").route(web::post().to(login::<B>)))
            // The gateway's callbacks authenticate themselves with the HMAC signature, not a JWT.
            .service(
                web::scope("/payment/vnpay")
                    .service(web::resource("/ipn").route(web::get().to(vnpay_ipn::<B>)))
                    .service(web::resource("/return").route(web::get().to(vnpay_return))),
            )
            .service(
                web::scope("/api")
                    .wrap(JwtMiddlewareFactory::new(config.auth.jwt_secret.clone()))
                    .service(
                        web::resource("/checkout")
                            .wrap(AclMiddlewareFactory::new(&[PERM_ORDER_CREATE]))
                            .route(web::post().to(checkout::<B>)),
                    )
                    .service(
                        web::resource("/admin/list")
                            .wrap(AclMiddlewareFactory::new(&[PERM_REPORT_VIEW]))
                            .route(web::post().to(admin_list::<B>)),
                    ),
            )
    })
    .bind(bind_addr)?
    .run();
    Ok(srv)
}
