//! Permission claim compression.
//!
//! A back-office user can hold dozens of fine-grained permission codes (`PRODUCT.VIEW`,
//! `ORDER.REFUND`, ...). Embedding them verbatim in the access token blows past typical
//! claim-size and header-size limits, so the set is compressed into a single opaque claim value at
//! login and expanded again by the authorization middleware on each request.
//!
//! The wire format is `base64( u32_le(uncompressed_len) || zlib(joined_codes) )` where
//! `joined_codes` is the comma-joined permission list. The length prefix makes the token
//! self-describing: decoding allocates exactly the advertised number of bytes and treats any
//! disagreement between the prefix and the actual stream as corruption.
//!
//! Decoding NEVER fails open. A token that cannot be decoded yields an error, and callers map
//! that to an empty permission set.

mod codec;
mod permission_set;

pub use codec::{decode, decode_all, encode, DecodeError};
pub use permission_set::PermissionSet;
