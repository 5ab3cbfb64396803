//! Webhook signature verification.
//!
//! LINE signs every webhook delivery with `x-line-signature`: the
//! base64-encoded HMAC-SHA256 of the raw request body, keyed by the
//! channel secret.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verifies webhook bodies against the channel secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    channel_secret: SecretString,
}

impl SignatureVerifier {
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self {
            channel_secret: SecretString::new(channel_secret.into()),
        }
    }

    /// Compute the signature LINE would send for `body`.
    pub fn sign(&self, body: &[u8]) -> Result<String, InvalidLength> {
        let mut mac = self.mac()?;
        mac.update(body);
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Check `signature` against the body. Bodies must be the exact bytes
    /// received; re-serialized JSON will not verify.
    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        let Ok(expected) = STANDARD.decode(signature.trim()) else {
            return false;
        };
        let Ok(mut mac) = self.mac() else {
            return false;
        };
        mac.update(body);
        mac.verify_slice(&expected).is_ok()
    }

    fn mac(&self) -> Result<HmacSha256, InvalidLength> {
        HmacSha256::new_from_slice(self.channel_secret.expose_secret().as_bytes())
    }
}
