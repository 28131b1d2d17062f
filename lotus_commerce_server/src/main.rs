use std::env;

use dotenvy::dotenv;
use log::*;
use lotus_commerce_engine::InMemoryBackend;
use lotus_commerce_server::{
    config::ServerConfig,
    routes::{PERM_ORDER_CREATE, PERM_REPORT_VIEW},
    server::run_server,
};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    let config = ServerConfig::from_env_or_default();
    let backend = InMemoryBackend::new();
    seed_dev_account(&backend);

    info!("🚀️ Starting server on {}:{}", config.host, config.port);
    match run_server(config, backend).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}

/// The in-memory backend starts empty, which makes a dev server impossible to log in to. If
/// `LCP_DEV_USERNAME` and `LCP_DEV_PASSWORD` are set, seed one account with the full permission
/// set so the flows can be exercised end to end.
fn seed_dev_account(backend: &InMemoryBackend) {
    let (username, password) = match (env::var("LCP_DEV_USERNAME"), env::var("LCP_DEV_PASSWORD")) {
        (Ok(u), Ok(p)) => (u, p),
        _ => {
            info!("🪛️ LCP_DEV_USERNAME / LCP_DEV_PASSWORD not set. No dev account seeded.");
            return;
        },
    };
    backend.add_account(&username, &password, &[PERM_ORDER_CREATE, PERM_REPORT_VIEW]);
    warn!("🚨️ Seeded dev account '{username}' with the full permission set. Not for production use.");
}
