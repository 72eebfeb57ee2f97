// src/params/signature.rs

//! HMAC-SHA256 webhook signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Decode a signature header into raw digest bytes.
///
/// Accepts both `sha256=<hex>` (GitHub) and bare `<hex>` (Gitea, Gogs).
/// Returns `None` for anything that is not a 32-byte hex digest.
pub fn decode_signature(header: &str) -> Option<Vec<u8>> {
    let hex_signature = header.trim();
    let hex_signature = hex_signature
        .strip_prefix("sha256=")
        .unwrap_or(hex_signature);

    let digest = hex::decode(hex_signature).ok()?;

    // SHA-256 produces 32-byte signatures - reject wrong lengths early
    (digest.len() == 32).then_some(digest)
}

/// Check that `digest` is the HMAC-SHA256 of `body` keyed with `secret`.
pub fn verify_hmac_sha256(secret: &str, digest: &[u8], body: &[u8]) -> bool {
    let Some(mac) = keyed_mac(secret, body) else {
        return false;
    };
    let computed = mac.finalize().into_bytes();

    computed.as_slice().ct_eq(digest).into()
}

/// Hex-encoded HMAC-SHA256, as a provider would send it.
pub fn sign_hex(secret: &str, body: &[u8]) -> String {
    keyed_mac(secret, body)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

fn keyed_mac(secret: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"ref":"refs/heads/main"}"#;

    #[test]
    fn accepts_prefixed_and_bare_hex() {
        let hex = sign_hex("abc", BODY);
        assert_eq!(decode_signature(&format!("sha256={hex}")).unwrap().len(), 32);
        assert_eq!(decode_signature(&hex).unwrap().len(), 32);
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(decode_signature("sha256=nothex").is_none());
        assert!(decode_signature("sha256=abcd").is_none());
        assert!(decode_signature("").is_none());
    }

    #[test]
    fn verifies_only_with_matching_secret_and_body() {
        let digest = decode_signature(&sign_hex("abc", BODY)).unwrap();
        assert!(verify_hmac_sha256("abc", &digest, BODY));
        assert!(!verify_hmac_sha256("abd", &digest, BODY));
        assert!(!verify_hmac_sha256("abc", &digest, b"{}"));
    }
}
