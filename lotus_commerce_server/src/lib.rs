//! # Lotus Commerce Server
//!
//! The HTTP front end for the Lotus commerce platform core. It is responsible for:
//! * Issuing access tokens at login, with the user's permission codes compressed into a claim.
//! * Enforcing permissions per route via the JWT and ACL middlewares.
//! * Redirecting checkouts to the VNPay gateway and receiving the gateway's callbacks.
//! * Serving the back office's generic list queries through the paging template.
//!
//! ## Configuration
//! The server is configured via `LCP_*` environment variables. See [config](config/index.html).
//!
//! ## Routes
//! * `/health`: liveness check.
//! * `POST /auth`: exchange credentials for an access token.
//! * `POST /api/checkout`: create an order and a signed gateway redirect URL.
//! * `GET /payment/vnpay/return`: the browser return leg; signature check only.
//! * `GET /payment/vnpay/ipn`: the gateway's server-to-server notification.
//! * `POST /api/admin/list`: generic filter/sort/page queries for admin grids.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
