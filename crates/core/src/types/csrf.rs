//! Anti-forgery tokens for state-changing admin requests.

use serde::{Deserialize, Serialize};

/// Number of random bytes in a token; the hex form is twice as long.
pub const CSRF_TOKEN_BYTES: usize = 32;

/// A per-session anti-forgery token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Mint a fresh token from the thread-local CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; CSRF_TOKEN_BYTES] = rand::random();
        Self(hex::encode(bytes))
    }

    /// Compare a submitted value against this token in constant time.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CsrfToken([REDACTED])")
    }
}

/// Constant-time byte comparison.
///
/// Length is not secret; only the contents are compared without early exit.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
