//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Entropy of an opaque token in bytes (256 bits)
pub const OPAQUE_TOKEN_BYTES: usize = 32;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate an opaque, header-safe random token.
///
/// 32 bytes from the OS CSPRNG, base64url without padding (43 chars).
pub fn random_opaque_token() -> String {
    to_base64_url(&random_bytes(OPAQUE_TOKEN_BYTES))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Short, non-reversible tag for a secret token, safe to put in logs.
pub fn token_fingerprint(token: &str) -> String {
    sha256(token.as_bytes())[..6]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Encode bytes as base64url (no padding)
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_opaque_token_shape() {
        let token = random_opaque_token();
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        let decoded = general_purpose::URL_SAFE_NO_PAD.decode(&token).unwrap();
        assert_eq!(decoded.len(), OPAQUE_TOKEN_BYTES);
    }

    #[test]
    fn test_opaque_tokens_do_not_repeat() {
        let tokens: std::collections::HashSet<String> =
            (0..256).map(|_| random_opaque_token()).collect();
        assert_eq!(tokens.len(), 256);
    }

    #[test]
    fn test_token_fingerprint() {
        let fp = token_fingerprint("some-refresh-token");
        assert_eq!(fp.len(), 12);
        assert_eq!(fp, token_fingerprint("some-refresh-token"));
        assert_ne!(fp, token_fingerprint("other-refresh-token"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abcd", b"abcd"));
        assert!(!constant_time_eq(b"abcd", b"abce"));
        assert!(!constant_time_eq(b"abcd", b"abc"));
    }
}
