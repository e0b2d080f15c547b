use sha2::{Digest, Sha256};

/// `sha256:<hex>` digest of `bytes`, the form used throughout the target repositories'
/// content-addressable storage (spec §4.7 "CTF on filesystem").
pub fn sha256_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    let hex: String = result.iter().map(|b| format!("{b:02x}")).collect();
    format!("sha256:{hex}")
}

/// Splits a `sha256:<hex>` digest into its algorithm and hex components, as used by the
/// filesystem repository's `blobs/<algorithm>/<digest>` layout.
pub fn split_digest(digest: &str) -> Option<(&str, &str)> {
    digest.split_once(':')
}
