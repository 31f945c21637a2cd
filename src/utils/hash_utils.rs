use sha2::{Digest, Sha256};

/// Calculates the SHA256 hash of a byte slice.
pub fn calculate_sha256_from_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hash_bytes = hasher.finalize();
    format!("{:x}", hash_bytes) // Format as hex string
}

/// True for a lowercase hex SHA256 digest, the only shape texture hashes take.
pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
