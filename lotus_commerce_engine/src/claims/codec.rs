use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use log::warn;
use thiserror::Error;

use crate::claims::PermissionSet;

/// The number of bytes reserved at the front of the blob for the little-endian uncompressed
/// length. The decoder allocates exactly this many bytes instead of guessing.
const LENGTH_PREFIX_BYTES: usize = 4;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Token is not valid base64. {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Token is too short to contain a length prefix")]
    Truncated,
    #[error("Token payload could not be decompressed. {0}")]
    Decompression(String),
    #[error("Token advertised {expected} bytes but decompressed to {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Decompressed payload is not valid UTF-8. {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Compresses a permission set into a single claim value.
///
/// The output is only deterministic up to the compressor's internals; callers must not compare
/// tokens for equality, only round-trip them through [`decode`]. An empty set produces a valid
/// (short) token meaning "no permissions".
pub fn encode(permissions: &PermissionSet) -> String {
    let joined = permissions.to_claim_string();
    let raw = joined.as_bytes();
    let blob = (raw.len() as u32).to_le_bytes().to_vec();
    let mut encoder = ZlibEncoder::new(blob, Compression::default());
    encoder.write_all(raw).expect("writing to an in-memory buffer cannot fail");
    let blob = encoder.finish().expect("compressing to an in-memory buffer cannot fail");
    base64::encode(blob)
}

/// Expands a claim value back into a permission set, upper-casing each code so that comparisons
/// against canonical permission codes are case-insensitive.
///
/// Any deviation from the expected format is an error. Callers on the authorization path must
/// treat an error as "zero permissions", never as "all permissions".
pub fn decode(token: &str) -> Result<PermissionSet, DecodeError> {
    let blob = base64::decode(token.trim())?;
    if blob.len() < LENGTH_PREFIX_BYTES {
        return Err(DecodeError::Truncated);
    }
    let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
    prefix.copy_from_slice(&blob[..LENGTH_PREFIX_BYTES]);
    let expected = u32::from_le_bytes(prefix) as usize;
    // Reading one byte past the advertised length lets us distinguish "stream was longer than
    // promised" from a clean stop, while still bounding the allocation for hostile prefixes.
    let mut raw = Vec::new();
    let mut decoder = ZlibDecoder::new(&blob[LENGTH_PREFIX_BYTES..]).take(expected as u64 + 1);
    decoder.read_to_end(&mut raw).map_err(|e| DecodeError::Decompression(e.to_string()))?;
    if raw.len() != expected {
        return Err(DecodeError::LengthMismatch { expected, actual: raw.len() });
    }
    let joined = String::from_utf8(raw)?;
    Ok(joined
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_uppercase)
        .collect())
}

/// Decodes several claim tokens (a user carries one per role) and unions the results.
///
/// A token that fails to decode is skipped with a warning; the remaining tokens still contribute.
/// This is the fail-closed behaviour the authorization middleware relies on.
pub fn decode_all<'a, I>(tokens: I) -> PermissionSet
where I: IntoIterator<Item = &'a str> {
    let mut result = PermissionSet::new();
    for token in tokens {
        match decode(token) {
            Ok(set) => result.merge(set),
            Err(e) => warn!("🔐️ Discarding undecodable permission claim: {e}"),
        }
    }
    result
}
