//! token-decoder: verify signed tokens against environment-specific
//! certificates, falling back to a shared HMAC secret.
//!
//! A token is checked against the environment's primary certificate, then
//! its secondary certificate, then the configured shared secret. The first
//! credential that verifies it wins.
//!
//! ```no_run
//! use token_decoder::{DecoderConfig, TokenDecoder};
//!
//! let decoder = TokenDecoder::new(
//!     DecoderConfig::default()
//!         .with_cert_dir("/etc/token-decoder/certs")
//!         .with_shared_secret("internal-hmac-secret"),
//! );
//!
//! match decoder.decode("eyJ...", "qa") {
//!     Ok(claims) => println!("app: {:?}", claims.get("app_id")),
//!     Err(e) => eprintln!("rejected: {e}"),
//! }
//! ```

#![forbid(unsafe_code)]

pub mod core;
pub mod error;

pub use crate::core::credential::{CertStore, DEFAULT_CERT_DIR, KeySource, load_public_key};
pub use crate::core::decoder::{DecoderConfig, TokenDecoder};
pub use crate::core::environment::{CertFamily, CertificateSlot, Environment};
pub use crate::core::secret::SharedSecret;
pub use crate::core::verifier::{CredentialKind, DecodedClaims, TokenVerifier, Verified};
pub use crate::error::{AttemptFailure, TokenDecoderError};
