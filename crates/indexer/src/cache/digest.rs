use sha2::{Digest, Sha256};

/// Hex SHA-256 of an upload's bytes; the cache key handed back to clients.
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
