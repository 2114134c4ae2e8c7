//! URL fingerprinting for cache keys.

use sha2::{Digest, Sha256};

/// Compute the cache key for a URL.
///
/// The exact URL bytes are hashed, so `http://a/` and `http://a` are distinct
/// keys. The key is only a lookup handle and carries no integrity guarantee.
pub fn fingerprint(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
