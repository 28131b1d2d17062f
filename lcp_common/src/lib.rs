mod helpers;
mod secret;
mod vnd;

pub use helpers::parse_boolean_flag;
pub use secret::Secret;
pub use vnd::{Vnd, VndConversionError, GATEWAY_MINOR_UNITS, VND_CURRENCY_CODE};
