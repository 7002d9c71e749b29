//! Shared test fixtures and helper utilities.
//!
//! Generates RSA-keyed certificates for both certificate families and
//! writes them into temporary certificate directories.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::path::Path;
use std::sync::OnceLock;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use tempfile::TempDir;

/// HMAC secret used to sign shared-secret test tokens.
pub const HMAC_TEST_SECRET: &str = "abcdefghijklmnopqrstuvwxyz0123456789abcdefghijklmnopqrstuvwxyz";

/// A malformed token with only two parts (missing signature).
pub const MALFORMED_TOKEN_TWO_PARTS: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

/// A completely invalid token string.
pub const INVALID_TOKEN: &str = "not-a-valid-jwt";

/// An RSA signing key and its self-signed certificate.
pub struct TestCert {
    pub signing_key_pem: String,
    pub cert_pem: String,
    pub cert_der: Vec<u8>,
}

impl TestCert {
    fn generate(common_name: &str) -> Self {
        let mut rng = rsa::rand_core::OsRng;
        let private_key = rsa::RsaPrivateKey::new(&mut rng, 2048).unwrap();
        let signing_key_pem = private_key.to_pkcs1_pem(LineEnding::LF).unwrap().to_string();
        let pkcs8_pem = private_key.to_pkcs8_pem(LineEnding::LF).unwrap();

        let key_pair =
            rcgen::KeyPair::from_pem_and_sign_algo(&pkcs8_pem, &rcgen::PKCS_RSA_SHA256).unwrap();
        let params = rcgen::CertificateParams::new(vec![common_name.to_string()]).unwrap();
        let cert = params.self_signed(&key_pair).unwrap();

        Self {
            signing_key_pem,
            cert_pem: cert.pem(),
            cert_der: cert.der().to_vec(),
        }
    }

    /// Create an RS256-signed token with the given claims.
    pub fn sign(&self, claims: &serde_json::Value) -> String {
        let key = EncodingKey::from_rsa_pem(self.signing_key_pem.as_bytes()).unwrap();
        encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
    }
}

/// Certificates for every (family, slot) pair.
pub struct CertSet {
    pub qa_primary: TestCert,
    pub qa_secondary: TestCert,
    pub production_primary: TestCert,
    pub production_secondary: TestCert,
}

impl CertSet {
    fn files(&self) -> [(&'static str, &TestCert); 4] {
        [
            ("qa.cer", &self.qa_primary),
            ("qa_secondary.cer", &self.qa_secondary),
            ("production.cer", &self.production_primary),
            ("production_secondary.cer", &self.production_secondary),
        ]
    }
}

/// The certificate set, generated once per test binary.
pub fn cert_set() -> &'static CertSet {
    static SET: OnceLock<CertSet> = OnceLock::new();
    SET.get_or_init(|| CertSet {
        qa_primary: TestCert::generate("qa-primary.token-decoder.test"),
        qa_secondary: TestCert::generate("qa-secondary.token-decoder.test"),
        production_primary: TestCert::generate("production-primary.token-decoder.test"),
        production_secondary: TestCert::generate("production-secondary.token-decoder.test"),
    })
}

/// Write PEM certificates into a fresh directory, prefixing file names.
pub fn write_cert_dir_with_prefix(prefix: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, cert) in cert_set().files() {
        std::fs::write(dir.path().join(format!("{prefix}{name}")), &cert.cert_pem).unwrap();
    }
    dir
}

/// Write PEM certificates into a fresh directory.
pub fn write_cert_dir() -> TempDir {
    write_cert_dir_with_prefix("")
}

/// Write DER certificates into a fresh directory.
pub fn write_der_cert_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, cert) in cert_set().files() {
        std::fs::write(dir.path().join(name), &cert.cert_der).unwrap();
    }
    dir
}

/// Create an HS256-signed token with the given claims.
pub fn create_hs256_token(secret: &str, claims: &serde_json::Value) -> String {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &key).unwrap()
}

/// The claims used across scenarios.
pub fn app_claims() -> serde_json::Value {
    serde_json::json!({"app_id": "evo"})
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}
