//! Core business logic for token verification.
//!
//! This module contains the domain logic separated from CLI concerns.
//! All types and functions here are testable without the CLI layer.

pub mod credential;
pub mod decoder;
pub mod environment;
pub mod secret;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

use jsonwebtoken::errors::ErrorKind;

use crate::error::AttemptFailure;

/// Map a `jsonwebtoken` error kind to an attempt failure.
///
/// Reasons are fixed strings rather than forwarded library messages,
/// which may echo token content.
pub(crate) fn classify_jwt_error(kind: &ErrorKind) -> AttemptFailure {
    match kind {
        ErrorKind::InvalidSignature => AttemptFailure::SignatureInvalid,
        // The key was rejected by the verifier, so the signature cannot match.
        ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
            AttemptFailure::SignatureInvalid
        }
        ErrorKind::ExpiredSignature => AttemptFailure::ClaimExpired,
        ErrorKind::ImmatureSignature => AttemptFailure::ClaimNotYetValid,
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
            AttemptFailure::AlgorithmMismatch
        }
        ErrorKind::InvalidAlgorithmName => malformed("unsupported algorithm in token header"),
        ErrorKind::InvalidToken => malformed("invalid token structure"),
        ErrorKind::Base64(_) => malformed("invalid base64url encoding"),
        ErrorKind::Json(_) => malformed("token header or payload is not a valid JSON object"),
        ErrorKind::Utf8(_) => malformed("token contains invalid UTF-8"),
        _ => malformed("unexpected validation error"),
    }
}

fn malformed(reason: &str) -> AttemptFailure {
    AttemptFailure::TokenMalformed {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_invalid_signature() {
        assert_eq!(
            classify_jwt_error(&ErrorKind::InvalidSignature),
            AttemptFailure::SignatureInvalid
        );
    }

    #[test]
    fn test_classify_temporal_errors() {
        assert_eq!(
            classify_jwt_error(&ErrorKind::ExpiredSignature),
            AttemptFailure::ClaimExpired
        );
        assert_eq!(
            classify_jwt_error(&ErrorKind::ImmatureSignature),
            AttemptFailure::ClaimNotYetValid
        );
    }

    #[test]
    fn test_classify_algorithm_mismatch() {
        assert_eq!(
            classify_jwt_error(&ErrorKind::InvalidAlgorithm),
            AttemptFailure::AlgorithmMismatch
        );
    }

    #[test]
    fn test_classify_invalid_token_structure() {
        assert_eq!(
            classify_jwt_error(&ErrorKind::InvalidToken),
            AttemptFailure::TokenMalformed {
                reason: "invalid token structure".to_string()
            }
        );
    }

    #[test]
    fn test_classify_unknown_error() {
        assert_eq!(
            classify_jwt_error(&ErrorKind::InvalidIssuer),
            AttemptFailure::TokenMalformed {
                reason: "unexpected validation error".to_string()
            }
        );
    }
}
