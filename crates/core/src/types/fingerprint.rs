//! Order-independent digest of a cart's resolved contents.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ProductId;

/// SHA-256 hex digest of the sorted, comma-joined product ids.
///
/// Two carts with the same multiset of resolved products always produce the
/// same fingerprint regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartFingerprint(String);

impl CartFingerprint {
    /// Fingerprint a list of resolved product ids.
    #[must_use]
    pub fn of(ids: &[ProductId]) -> Self {
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();

        let canonical = sorted
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        Self(hex::encode(Sha256::digest(canonical.as_bytes())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CartFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i32]) -> Vec<ProductId> {
        raw.iter().copied().map(ProductId::new).collect()
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        assert_eq!(
            CartFingerprint::of(&ids(&[3, 1, 2])),
            CartFingerprint::of(&ids(&[1, 2, 3]))
        );
    }

    #[test]
    fn test_quantity_changes_fingerprint() {
        assert_ne!(
            CartFingerprint::of(&ids(&[1, 2])),
            CartFingerprint::of(&ids(&[1, 2, 2]))
        );
    }

    #[test]
    fn test_sorts_numerically_not_lexically() {
        // "2,10" and "10,2" must both canonicalise to "2,10"
        let expected = hex::encode(Sha256::digest(b"2,10"));
        assert_eq!(CartFingerprint::of(&ids(&[10, 2])).as_str(), expected);
    }

    #[test]
    fn test_known_digest() {
        let expected = hex::encode(Sha256::digest(b"1,2"));
        let fingerprint = CartFingerprint::of(&ids(&[2, 1]));
        assert_eq!(fingerprint.as_str(), expected);
        assert_eq!(fingerprint.as_str().len(), 64);
    }
}
