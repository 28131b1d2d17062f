//! Lotus Commerce Engine
//!
//! The core library for the Lotus commerce platform. It is deliberately free of any web framework
//! or database driver; the HTTP front end and the storage adapters live elsewhere and talk to this
//! crate through the traits in [`mod@traits`].
//!
//! The engine has three jobs:
//! 1. Compressing a user's permission codes into a compact claim token at login, and expanding
//!    that token back into a permission set on every request ([`mod@claims`]). Token decoding
//!    fails closed: a broken token grants nothing.
//! 2. Building and verifying signed VNPay payment URLs and IPN callbacks ([`mod@vnpay`]). The
//!    build and verify paths share a single canonical sign-string routine, so anything the engine
//!    signs, it can verify.
//! 3. Turning generic filter/sort/page requests from the admin back office into parameterized
//!    count + page SQL statements ([`mod@paging`]). The engine only emits SQL text; execution is
//!    the backend's problem.
//!
//! The thin API layer in [`mod@api`] ties the pieces to the backend traits: `AuthApi` drives the
//! login → permissions → claim-token path, `PaymentApi` drives checkout and the IPN decision
//! logic, and `ListApi` runs a paged query through a [`traits::SqlExecutor`].

pub mod api;
pub mod claims;
pub mod memory;
pub mod paging;
pub mod traits;
pub mod vnpay;

pub use api::{AuthApi, IpnOutcome, ListApi, PaymentApi};
pub use memory::InMemoryBackend;
