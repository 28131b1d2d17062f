//! The engine's public API layer: thin generic wrappers that tie the pure components to the
//! backend traits. The HTTP layer holds one of each and stays free of business decisions.

mod auth_api;
mod list_api;
mod payment_api;

pub use auth_api::AuthApi;
pub use list_api::{ListApi, ListApiError};
pub use payment_api::{IpnOutcome, PaymentApi, PaymentApiError};
