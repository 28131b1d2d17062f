//! The backend seams. The engine never talks to storage directly; the HTTP layer hands it
//! implementations of these traits. Production deployments wire real database adapters in;
//! development and tests use [`crate::memory::InMemoryBackend`] or mocks.

mod auth_management;
mod data_objects;
mod order_management;
mod sql_executor;

pub use auth_management::{AuthApiError, AuthManagement};
pub use data_objects::{CustomerAccount, NewOrder, Order, OrderStatusType};
pub use order_management::{OrderApiError, OrderManagement};
pub use sql_executor::{ExecutorError, SqlExecutor};
