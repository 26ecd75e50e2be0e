// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Inbound event signature verification
//!
//! Proves that an event originated from the trusted source and was not
//! tampered with in transit: HMAC-SHA256 over the exact request bytes (never
//! a re-serialized form, which would change the byte sequence), hex encoded,
//! compared against the presented signature. The comparison goes through
//! `Mac::verify_slice`, which does not leak timing proportional to the
//! mismatch position.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Optional algorithm prefix on the presented signature
const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a presented signature against the raw request body.
///
/// Accepts both `sha256=<hex>` and bare hex forms. An empty secret, an
/// empty signature, or a malformed hex string all verify as false rather
/// than erroring: the verifier fails closed, and a forged or malformed
/// signature is a permanent rejection, never a retry case.
pub fn verify(body: &[u8], presented: &str, secret: &str) -> bool {
    if secret.is_empty() || presented.is_empty() {
        return false;
    }

    let hex_digest = presented.strip_prefix(SIGNATURE_PREFIX).unwrap_or(presented);
    let Ok(digest) = hex::decode(hex_digest) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    mac.verify_slice(&digest).is_ok()
}

/// Compute the hex-encoded HMAC-SHA256 signature of a body.
///
/// Counterpart of [`verify`], used by tests and by operators replaying
/// deliveries against a local instance.
pub fn sign(body: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
