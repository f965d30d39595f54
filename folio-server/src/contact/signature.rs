//! Webhook payload signing.
//!
//! Outbound submissions carry `x-webhook-signature`: the hex HMAC-SHA256 of
//! the exact body bytes, keyed with the shared webhook secret. Receivers
//! recompute it over the raw body they received.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Sign a canonical payload, returning the lowercase hex digest.
///
/// `None` only if the MAC rejects the key, which HMAC never does in practice.
pub fn sign_payload(secret: &str, payload: &[u8]) -> Option<String> {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("webhook_signature_invalid_key");
            return None;
        }
    };

    mac.update(payload);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Check a received signature against the payload it claims to cover, the
/// way a downstream receiver does.
#[cfg(test)]
pub(crate) fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    if secret.is_empty() || signature.is_empty() {
        warn!(
            has_secret = !secret.is_empty(),
            has_signature = !signature.is_empty(),
            "webhook_signature_missing_fields"
        );
        return false;
    }

    let expected = match sign_payload(secret, payload) {
        Some(sig) => sig,
        None => return false,
    };

    let valid = constant_time_compare(&expected, &signature.to_ascii_lowercase());
    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature.len(),
            "webhook_signature_mismatch"
        );
    }
    valid
}

/// Constant-time string comparison to prevent timing attacks.
#[cfg(test)]
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check if a signing secret is configured.
pub fn is_signing_configured(secret: &Option<String>) -> bool {
    secret
        .as_ref()
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}
