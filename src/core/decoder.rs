//! High-level decoding entry point.
//!
//! [`TokenDecoder`] wires a filesystem [`CertStore`] and a
//! [`SharedSecret`] into a [`TokenVerifier`] from an explicit
//! [`DecoderConfig`]. Hosts create one decoder at startup and share it
//! between threads.

use std::fmt;
use std::path::PathBuf;

use zeroize::Zeroizing;

use super::credential::{CertStore, DEFAULT_CERT_DIR};
use super::environment::{CertificateSlot, Environment};
use super::secret::SharedSecret;
use super::verifier::{DecodedClaims, TokenVerifier, Verified};
use crate::error::TokenDecoderError;

/// Configuration for a [`TokenDecoder`].
///
/// Implements a custom `Debug` that redacts the shared secret.
#[derive(Clone)]
pub struct DecoderConfig {
    /// Directory holding the four certificate files.
    pub cert_dir: PathBuf,
    /// Prefix prepended to every certificate file name.
    pub file_prefix: String,
    /// Keep parsed certificate keys in memory until their files change.
    pub cache_keys: bool,
    /// Initial HMAC shared secret.
    pub shared_secret: Option<Zeroizing<String>>,
}

impl DecoderConfig {
    pub fn with_cert_dir(mut self, cert_dir: impl Into<PathBuf>) -> Self {
        self.cert_dir = cert_dir.into();
        self
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn with_cache(mut self, cache_keys: bool) -> Self {
        self.cache_keys = cache_keys;
        self
    }

    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(Zeroizing::new(secret.into()));
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            cert_dir: PathBuf::from(DEFAULT_CERT_DIR),
            file_prefix: String::new(),
            cache_keys: false,
            shared_secret: None,
        }
    }
}

impl fmt::Debug for DecoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderConfig")
            .field("cert_dir", &self.cert_dir)
            .field("file_prefix", &self.file_prefix)
            .field("cache_keys", &self.cache_keys)
            .field(
                "shared_secret",
                &self.shared_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Verifies tokens against environment certificates and a shared secret.
#[derive(Debug)]
pub struct TokenDecoder {
    verifier: TokenVerifier<CertStore>,
}

impl TokenDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        let mut store = CertStore::new(config.cert_dir).with_prefix(config.file_prefix);
        if config.cache_keys {
            store = store.with_cache();
        }

        let secret = SharedSecret::new();
        if let Some(value) = config.shared_secret {
            secret.set(value.as_str());
        }

        Self {
            verifier: TokenVerifier::new(store, secret),
        }
    }

    /// Verify `token` for the named environment and return its claims.
    ///
    /// `environment` is matched case-sensitively; names other than
    /// `test`, `qa` and `development` use the production certificates.
    ///
    /// # Errors
    ///
    /// Returns [`TokenDecoderError::TokenInvalid`] if neither certificate
    /// nor the shared secret verifies the token.
    pub fn decode(
        &self,
        token: &str,
        environment: &str,
    ) -> Result<DecodedClaims, TokenDecoderError> {
        self.verifier.decode(token, &Environment::from_name(environment))
    }

    /// Like [`decode`](Self::decode), also returning the header and the
    /// credential that verified the token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenDecoderError::TokenInvalid`] if neither certificate
    /// nor the shared secret verifies the token.
    pub fn verify(&self, token: &str, environment: &str) -> Result<Verified, TokenDecoderError> {
        self.verifier.verify(token, &Environment::from_name(environment))
    }

    /// Resolve the certificate file used for `environment` and `slot`.
    pub fn certificate_path(&self, environment: &str, slot: CertificateSlot) -> PathBuf {
        self.verifier
            .keys()
            .certificate_path(&Environment::from_name(environment), slot)
    }

    /// Handle to the shared secret; clones of it update this decoder.
    pub fn shared_secret(&self) -> &SharedSecret {
        self.verifier.shared_secret()
    }

    pub fn set_shared_secret(&self, secret: impl Into<String>) {
        self.verifier.shared_secret().set(secret);
    }
}

impl Default for TokenDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}
