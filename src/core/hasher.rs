use crate::core::PayloadHasher;
use sha2::{Digest, Sha256};

/// SHA-256 over the payload text itself (the base64 characters, not the decoded bytes).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PayloadHasher for Sha256Hasher {
    fn digest(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hex::encode(hasher.finalize())
    }
}
