//! Certificate storage and public key loading.
//!
//! A [`CertStore`] knows where certificates live and turns an
//! (environment family, slot) pair into an RSA [`DecodingKey`]. Loading
//! failures are reported as [`AttemptFailure::CredentialUnavailable`] so
//! the verifier can move on to the next credential.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use jsonwebtoken::DecodingKey;
use tracing::{debug, warn};
use x509_parser::certificate::X509Certificate;
use x509_parser::parse_x509_certificate;
use x509_parser::pem::parse_x509_pem;
use x509_parser::public_key::PublicKey;

use super::environment::{CertFamily, CertificateSlot, Environment, certificate_file_name};
use crate::error::AttemptFailure;

/// Default certificate storage root, next to the crate manifest.
pub const DEFAULT_CERT_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public_key_certs");

/// Supplies the RSA public key for a certificate family and slot.
///
/// The verifier only talks to this trait, which lets tests observe the
/// order in which credentials are requested.
pub trait KeySource {
    /// Load the public key of the given certificate.
    ///
    /// # Errors
    ///
    /// Returns [`AttemptFailure::CredentialUnavailable`] if the key cannot
    /// be produced.
    fn public_key(
        &self,
        family: CertFamily,
        slot: CertificateSlot,
    ) -> Result<DecodingKey, AttemptFailure>;
}

impl<K: KeySource + ?Sized> KeySource for &K {
    fn public_key(
        &self,
        family: CertFamily,
        slot: CertificateSlot,
    ) -> Result<DecodingKey, AttemptFailure> {
        (**self).public_key(family, slot)
    }
}

/// Filesystem-backed certificate store.
///
/// Files are named `{prefix}{family}.cer` and
/// `{prefix}{family}_secondary.cer` under a fixed root directory.
pub struct CertStore {
    root: PathBuf,
    prefix: String,
    cache: Option<Mutex<HashMap<(CertFamily, CertificateSlot), CachedKey>>>,
}

/// A parsed key together with the file metadata it was read under.
struct CachedKey {
    stamp: FileStamp,
    key: DecodingKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
}

impl FileStamp {
    /// Without a modification time a same-length replacement is
    /// undetectable, so such files are never cached.
    fn new(modified: Option<SystemTime>, len: u64) -> Option<Self> {
        modified.map(|modified| Self { modified, len })
    }

    fn of(path: &Path) -> io::Result<Option<Self>> {
        let meta = fs::metadata(path)?;
        Ok(Self::new(meta.modified().ok(), meta.len()))
    }
}

impl CertStore {
    /// Create a store reading from `root`, with no file-name prefix and no
    /// caching.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefix: String::new(),
            cache: None,
        }
    }

    /// Prepend `prefix` to every certificate file name.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Keep parsed keys in memory until the underlying file changes.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(Mutex::new(HashMap::new()));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the certificate path for an environment and slot.
    ///
    /// Pure function of its inputs and the store's root; nothing is read
    /// from disk.
    pub fn certificate_path(&self, environment: &Environment, slot: CertificateSlot) -> PathBuf {
        self.file_path(environment.family(), slot)
    }

    fn file_path(&self, family: CertFamily, slot: CertificateSlot) -> PathBuf {
        self.root.join(certificate_file_name(&self.prefix, family, slot))
    }

    fn load_cached(
        &self,
        cache: &Mutex<HashMap<(CertFamily, CertificateSlot), CachedKey>>,
        family: CertFamily,
        slot: CertificateSlot,
        path: &Path,
    ) -> Result<DecodingKey, AttemptFailure> {
        let slot_key = (family, slot);
        let stamp = match FileStamp::of(path) {
            Ok(Some(stamp)) => stamp,
            Ok(None) => {
                lock(cache).remove(&slot_key);
                return load_public_key(path);
            }
            Err(e) => {
                lock(cache).remove(&slot_key);
                return Err(unavailable(path, describe_io_error(&e)));
            }
        };

        if let Some(entry) = lock(cache).get(&slot_key) {
            if entry.stamp == stamp {
                debug!(%family, %slot, "using cached certificate key");
                return Ok(entry.key.clone());
            }
        }

        match load_public_key(path) {
            Ok(key) => {
                lock(cache).insert(
                    slot_key,
                    CachedKey {
                        stamp,
                        key: key.clone(),
                    },
                );
                Ok(key)
            }
            Err(failure) => {
                lock(cache).remove(&slot_key);
                Err(failure)
            }
        }
    }
}

impl Default for CertStore {
    fn default() -> Self {
        Self::new(DEFAULT_CERT_DIR)
    }
}

impl fmt::Debug for CertStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertStore")
            .field("root", &self.root)
            .field("prefix", &self.prefix)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl KeySource for CertStore {
    fn public_key(
        &self,
        family: CertFamily,
        slot: CertificateSlot,
    ) -> Result<DecodingKey, AttemptFailure> {
        let path = self.file_path(family, slot);
        match &self.cache {
            Some(cache) => self.load_cached(cache, family, slot, &path),
            None => load_public_key(&path),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read a certificate file and extract its RSA public key.
///
/// Accepts PEM (`-----BEGIN CERTIFICATE-----`) and raw DER encodings.
///
/// # Errors
///
/// Returns [`AttemptFailure::CredentialUnavailable`] if the file cannot be
/// read, is not an X.509 certificate, or carries a non-RSA key.
pub fn load_public_key(path: &Path) -> Result<DecodingKey, AttemptFailure> {
    let bytes = fs::read(path).map_err(|e| unavailable(path, describe_io_error(&e)))?;

    public_key_from_certificate(&bytes).map_err(|reason| {
        warn!(path = %path.display(), %reason, "certificate file is present but unusable");
        unavailable(path, reason)
    })
}

/// Parse certificate bytes and return the subject's RSA public key.
fn public_key_from_certificate(bytes: &[u8]) -> Result<DecodingKey, String> {
    if bytes.trim_ascii_start().starts_with(b"-----BEGIN") {
        let (_, pem) = parse_x509_pem(bytes).map_err(|_| "invalid PEM encoding".to_string())?;
        let cert = pem
            .parse_x509()
            .map_err(|_| "PEM block is not an X.509 certificate".to_string())?;
        rsa_public_key(&cert)
    } else {
        let (_, cert) = parse_x509_certificate(bytes)
            .map_err(|_| "not an X.509 certificate".to_string())?;
        rsa_public_key(&cert)
    }
}

fn rsa_public_key(cert: &X509Certificate<'_>) -> Result<DecodingKey, String> {
    let spki = cert.public_key();
    match spki.parsed() {
        // The subject public key bit string of an RSA SPKI is the PKCS#1
        // RSAPublicKey structure that `from_rsa_der` expects.
        Ok(PublicKey::RSA(_)) => Ok(DecodingKey::from_rsa_der(&spki.subject_public_key.data)),
        Ok(_) => Err("certificate public key is not an RSA key".to_string()),
        Err(_) => Err("certificate public key could not be decoded".to_string()),
    }
}

fn unavailable(path: &Path, reason: impl Into<String>) -> AttemptFailure {
    AttemptFailure::CredentialUnavailable {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Map an I/O error to a short reason without OS-specific detail.
fn describe_io_error(err: &io::Error) -> &'static str {
    match err.kind() {
        io::ErrorKind::NotFound => "file not found",
        io::ErrorKind::PermissionDenied => "permission denied",
        _ => "failed to read file",
    }
}
