// crates/content-gate-core/src/core/hashing.rs
// ============================================================================
// Module: Content Gate Stable Hashing
// Description: Deterministic URL hashing for persistence sub-keys.
// Purpose: Derive store keys that stay identical across runs and platforms.
// Dependencies: sha2
// ============================================================================

//! ## Overview
//! Persistence keys derived from URLs must never depend on process-local hash
//! seeds. [`stable_url_hash`] truncates a SHA-256 digest to 64 bits and renders
//! it as lowercase hex.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Number of digest bytes kept for URL sub-keys (64 bits).
const URL_HASH_BYTES: usize = 8;

/// Returns the 64-bit SHA-256 prefix of `url` as 16 lowercase hex digits.
#[must_use]
pub fn stable_url_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex_encode(&digest[.. URL_HASH_BYTES])
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as lowercase hex.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::stable_url_hash;

    #[test]
    fn hash_matches_known_sha256_prefix() {
        assert_eq!(stable_url_hash("https://example.com/landing"), "bdcb11ade5a67519");
        assert_eq!(stable_url_hash(""), "e3b0c44298fc1c14");
    }

    #[test]
    fn hash_is_sixteen_hex_digits() {
        let hash = stable_url_hash("https://example.com/?a=1&b=2");
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_uppercase()));
    }
}
