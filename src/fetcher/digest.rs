// src/fetcher/digest.rs
// =============================================================================
// Content digest of a response body.
//
// The digest is MD5 over the raw body bytes, hex encoded in lowercase
// (16 bytes -> 32 characters). Bodies are hashed exactly as received: no
// decoding, no trimming, and the status code plays no part.
// =============================================================================

use md5::{Digest, Md5};

/// Returns the lowercase hex MD5 of `bytes`.
pub fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
