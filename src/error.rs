//! Domain error types for token-decoder.
//!
//! Verification attempts fail with [`AttemptFailure`], which the fallback
//! chain recovers from locally. Only the final attempt's failure reaches
//! the caller, wrapped in [`TokenDecoderError::TokenInvalid`].

use thiserror::Error;

/// Why a single verification attempt did not succeed.
///
/// None of these are fatal on their own: the verifier moves on to the
/// next credential until the chain is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    /// The certificate file is missing, unreadable, or does not hold a
    /// usable RSA public key.
    #[error("credential unavailable at '{path}': {reason}")]
    CredentialUnavailable {
        /// Path of the certificate that could not be loaded.
        path: String,
        /// Description of the load failure.
        reason: String,
    },

    /// The signature does not match the credential.
    #[error("signature does not match")]
    SignatureInvalid,

    /// The `exp` claim lies in the past.
    #[error("token has expired")]
    ClaimExpired,

    /// The `nbf` claim lies in the future.
    #[error("token is not yet valid")]
    ClaimNotYetValid,

    /// The token header names an algorithm other than the pinned one.
    #[error("token algorithm does not match the expected algorithm")]
    AlgorithmMismatch,

    /// The token could not be parsed at all.
    #[error("malformed token: {reason}")]
    TokenMalformed {
        /// Sanitized description of the structural problem.
        reason: String,
    },
}

/// Errors surfaced by token-decoder.
#[derive(Debug, Error)]
pub enum TokenDecoderError {
    /// Every credential in the fallback chain rejected the token.
    ///
    /// `cause` always comes from the last attempt (the shared secret), so
    /// it says nothing about which certificate family was tried first.
    #[error("invalid token: {cause}")]
    TokenInvalid {
        /// Failure of the final verification attempt.
        cause: AttemptFailure,
    },

    /// No token was provided via any input method.
    #[error("no token provided: pass a token as an argument, via --token-env, or through stdin")]
    NoTokenProvided,

    /// Stdin was piped but could not be read as text.
    #[error("failed to read token from stdin: {reason}")]
    StdinRead {
        /// Short description of the read failure.
        reason: String,
    },

    /// The specified environment variable is not set.
    #[error("environment variable '{name}' is not set")]
    EnvVarNotFound {
        /// Name of the missing environment variable.
        name: String,
    },

    /// The environment variable name cannot be looked up.
    #[error("invalid environment variable name '{name}'")]
    InvalidEnvVarName {
        /// The rejected name.
        name: String,
    },
}
