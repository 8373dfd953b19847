//! LINE webhook signature verification.
//!
//! `X-Line-Signature` carries base64(HMAC-SHA256(channel secret, raw
//! body)). The raw body must be verified before it is parsed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn verify(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);

    let Ok(claimed) = BASE64.decode(signature) else {
        return false;
    };
    mac.verify_slice(&claimed).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_passes() {
        let body = br#"{"events":[]}"#;
        let signature = sign("channel-secret", body);
        assert!(verify("channel-secret", body, &signature));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let body = br#"{"events":[]}"#;
        let signature = sign("other-secret", body);
        assert!(!verify("channel-secret", body, &signature));
    }

    #[test]
    fn test_tampered_body_fails() {
        let signature = sign("channel-secret", br#"{"events":[]}"#);
        assert!(!verify("channel-secret", br#"{"events":[{}]}"#, &signature));
    }

    #[test]
    fn test_garbage_signature_fails() {
        assert!(!verify("channel-secret", b"body", "not base64 !!!"));
        assert!(!verify("channel-secret", b"body", ""));
    }
}
