//! Fixtures for unit tests.
//!
//! Certificate and token builders live in `tests/common` and are shared
//! with the integration tests; only unit-specific helpers are added here.

#[path = "../../tests/common/mod.rs"]
mod common;

pub(crate) use common::{cert_set, create_hs256_token, write_cert_dir};

/// A self-signed certificate over an ECDSA P-256 key.
pub(crate) fn ecdsa_cert_pem() -> String {
    let key_pair = rcgen::KeyPair::generate().unwrap();
    let params = rcgen::CertificateParams::new(vec!["ecdsa.token-decoder.test".to_string()])
        .unwrap();
    params.self_signed(&key_pair).unwrap().pem()
}
