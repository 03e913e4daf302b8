//! Signed tokens guarding the add form
//!
//! A token is `<nonce>.<expires>.<signature>`, where the signature is an
//! HMAC-SHA256 over `<nonce>.<expires>` keyed with the secret key. Tokens
//! are stateless and stay valid until they expire.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use log::warn;
use sha2::Sha256;

use crate::config::Config;
use crate::error::{CafeError, Result};

type HmacSha256 = Hmac<Sha256>;

/// How long an issued token is accepted
pub const TOKEN_TTL_SECS: i64 = 3600;

pub const TOKEN_MISSING: &str = "The CSRF token is missing.";
pub const TOKEN_INVALID: &str = "The CSRF token is invalid.";
pub const TOKEN_EXPIRED: &str = "The CSRF token has expired.";

/// Issues and checks form tokens
#[derive(Clone)]
pub struct CsrfSigner {
    mac: HmacSha256,
    ttl: Duration,
}

impl CsrfSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .map_err(|e| CafeError::Config(format!("unusable secret key: {}", e)))?;
        Ok(Self { mac, ttl: Duration::seconds(TOKEN_TTL_SECS) })
    }

    /// Signer keyed with `SECRET_KEY`, or with a per-process random key if unset.
    /// Without a configured key, forms rendered before a restart stop validating.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.secret_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(secret) => Self::new(secret),
            None => {
                warn!("SECRET_KEY is not set; using a random key for this process");
                Self::new(rand::random::<[u8; 32]>())
            }
        }
    }

    pub fn issue(&self) -> String {
        self.issue_at(Utc::now())
    }

    fn issue_at(&self, now: DateTime<Utc>) -> String {
        let nonce: [u8; 16] = rand::random();
        let payload = format!("{}.{}", hex::encode(nonce), (now + self.ttl).timestamp());
        let signature = hex::encode(self.sign(&payload).finalize().into_bytes());
        format!("{}.{}", payload, signature)
    }

    /// Check a submitted token, returning the message to show on failure
    pub fn verify(&self, token: &str) -> std::result::Result<(), &'static str> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> std::result::Result<(), &'static str> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TOKEN_MISSING);
        }

        let (payload, signature) = token.rsplit_once('.').ok_or(TOKEN_INVALID)?;
        let (_, expires) = payload.split_once('.').ok_or(TOKEN_INVALID)?;
        let expires: i64 = expires.parse().map_err(|_| TOKEN_INVALID)?;
        let signature = hex::decode(signature).map_err(|_| TOKEN_INVALID)?;

        self.sign(payload).verify_slice(&signature).map_err(|_| TOKEN_INVALID)?;

        if now.timestamp() > expires {
            return Err(TOKEN_EXPIRED);
        }
        Ok(())
    }

    fn sign(&self, payload: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac
    }
}
