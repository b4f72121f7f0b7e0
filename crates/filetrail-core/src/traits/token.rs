//! Capability token generation for share links.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

/// Produces globally unique, unpredictable bearer tokens.
pub trait TokenGenerator: Send + Sync + 'static {
    /// Generate a fresh token.
    fn generate(&self) -> String;
}

/// Token generator backed by the thread-local CSPRNG.
///
/// Tokens are `byte_len` random bytes encoded as URL-safe base64 without
/// padding, so 32 bytes yield a 43 character token.
#[derive(Debug, Clone)]
pub struct RandomTokenGenerator {
    byte_len: usize,
}

impl RandomTokenGenerator {
    /// Create a generator producing tokens of `byte_len` random bytes.
    pub fn new(byte_len: usize) -> Self {
        Self { byte_len }
    }
}

impl Default for RandomTokenGenerator {
    fn default() -> Self {
        Self::new(32)
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = vec![0u8; self.byte_len];
        rand::rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
