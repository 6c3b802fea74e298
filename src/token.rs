use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Raw token entropy in bytes (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Generate a fresh reset token as lowercase hex.
pub fn generate() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

/// SHA-256 of the raw token, lowercase hex. This is the only form ever stored.
pub fn hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn hashes_match(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}
