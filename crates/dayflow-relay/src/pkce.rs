//! PKCE verifier and challenge generation (RFC 7636, S256).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

/// A code verifier together with its S256 challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// Generates a verifier from 32 random bytes.
    pub fn generate() -> Self {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        let verifier = URL_SAFE_NO_PAD.encode(random_bytes);
        let challenge = challenge_for(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

/// `base64url(SHA-256(verifier))` without padding.
pub fn challenge_for(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}
