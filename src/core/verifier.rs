//! The credential fallback chain.
//!
//! A token is tried against the environment's primary certificate, then
//! its secondary certificate, then the HMAC shared secret. The first
//! credential that verifies the token wins. Every attempt pins its
//! algorithm; the `alg` field of the token header is never trusted.

use std::collections::HashSet;
use std::fmt;

use jsonwebtoken::{Algorithm, Header, Validation, decode};
use serde_json::{Map, Value};
use tracing::debug;

use super::classify_jwt_error;
use super::credential::{CertStore, KeySource};
use super::environment::{CertFamily, CertificateSlot, Environment};
use super::secret::SharedSecret;
use crate::error::{AttemptFailure, TokenDecoderError};

/// The credential that verified a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    PrimaryCertificate,
    SecondaryCertificate,
    SharedSecret,
}

impl CredentialKind {
    /// The algorithm this credential verifies with.
    pub fn algorithm(self) -> Algorithm {
        match self {
            Self::PrimaryCertificate | Self::SecondaryCertificate => Algorithm::RS256,
            Self::SharedSecret => Algorithm::HS256,
        }
    }

    fn slot(self) -> Option<CertificateSlot> {
        match self {
            Self::PrimaryCertificate => Some(CertificateSlot::Primary),
            Self::SecondaryCertificate => Some(CertificateSlot::Secondary),
            Self::SharedSecret => None,
        }
    }

    /// Stable lowercase identifier, used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrimaryCertificate => "primary_certificate",
            Self::SecondaryCertificate => "secondary_certificate",
            Self::SharedSecret => "shared_secret",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryCertificate => f.write_str("primary certificate"),
            Self::SecondaryCertificate => f.write_str("secondary certificate"),
            Self::SharedSecret => f.write_str("shared secret"),
        }
    }
}

/// Certificate-backed credentials, tried before the shared secret.
const CERTIFICATE_ATTEMPTS: [CredentialKind; 2] = [
    CredentialKind::PrimaryCertificate,
    CredentialKind::SecondaryCertificate,
];

/// Verified token claims.
///
/// Implements a custom `Debug` that redacts claim values.
#[derive(Clone, PartialEq)]
pub struct DecodedClaims(Map<String, Value>);

impl DecodedClaims {
    /// Look up a single claim.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<DecodedClaims> for Value {
    fn from(claims: DecodedClaims) -> Self {
        Value::Object(claims.0)
    }
}

impl fmt::Debug for DecodedClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedClaims")
            .field("claims", &"[REDACTED]")
            .field("count", &self.0.len())
            .finish()
    }
}

/// A successfully verified token.
#[derive(Debug, Clone)]
pub struct Verified {
    /// The token's JOSE header.
    pub header: Header,
    /// The verified payload.
    pub claims: DecodedClaims,
    /// Which credential accepted the token.
    pub credential: CredentialKind,
}

/// Runs the fallback chain against a [`KeySource`] and a shared secret.
#[derive(Debug)]
pub struct TokenVerifier<K = CertStore> {
    keys: K,
    secret: SharedSecret,
}

impl<K: KeySource> TokenVerifier<K> {
    pub fn new(keys: K, secret: SharedSecret) -> Self {
        Self { keys, secret }
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    pub fn shared_secret(&self) -> &SharedSecret {
        &self.secret
    }

    /// Verify `token` for `environment` and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenDecoderError::TokenInvalid`] if no credential
    /// accepts the token.
    pub fn decode(
        &self,
        token: &str,
        environment: &Environment,
    ) -> Result<DecodedClaims, TokenDecoderError> {
        self.verify(token, environment).map(|verified| verified.claims)
    }

    /// Verify `token` for `environment`, reporting which credential
    /// accepted it.
    ///
    /// Attempts run strictly in order and stop at the first success. The
    /// certificate attempts are expected to fail routinely for tokens
    /// minted by another signer, so their failures are only logged.
    ///
    /// # Errors
    ///
    /// Returns [`TokenDecoderError::TokenInvalid`] carrying the failure of
    /// the final (shared secret) attempt.
    pub fn verify(
        &self,
        token: &str,
        environment: &Environment,
    ) -> Result<Verified, TokenDecoderError> {
        let family = environment.family();

        for credential in CERTIFICATE_ATTEMPTS {
            match self.attempt(token, family, credential) {
                Ok(verified) => return Ok(verified),
                Err(failure) => {
                    debug!(
                        %environment,
                        %family,
                        %credential,
                        %failure,
                        "verification attempt failed"
                    );
                }
            }
        }

        self.attempt(token, family, CredentialKind::SharedSecret)
            .map_err(|cause| {
                debug!(%environment, %cause, "no credential accepted the token");
                TokenDecoderError::TokenInvalid { cause }
            })
    }

    fn attempt(
        &self,
        token: &str,
        family: CertFamily,
        credential: CredentialKind,
    ) -> Result<Verified, AttemptFailure> {
        let key = match credential.slot() {
            Some(slot) => self.keys.public_key(family, slot)?,
            None => self.secret.decoding_key(),
        };

        let validation = pinned_validation(credential.algorithm());
        let data = decode::<Map<String, Value>>(token, &key, &validation)
            .map_err(|e| classify_jwt_error(e.kind()))?;

        debug!(%family, %credential, "token verified");
        Ok(Verified {
            header: data.header,
            claims: DecodedClaims(data.claims),
            credential,
        })
    }
}

/// Validation rules shared by every attempt.
///
/// Exactly one algorithm is accepted. `exp` and `nbf` are checked when
/// present but not required; audience, issuer and subject are left to
/// the caller.
fn pinned_validation(algorithm: Algorithm) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
    validation
}
