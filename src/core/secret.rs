//! Thread-safe holder for the HMAC shared secret.
//!
//! The host application sets the secret once it is known (typically at
//! startup) and may replace or clear it later. Decoding threads read it
//! concurrently through a cloned handle.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use jsonwebtoken::DecodingKey;
use zeroize::Zeroizing;

/// A settable, shareable shared-secret slot.
///
/// Clones share the same underlying value. The stored secret is zeroized
/// when replaced or dropped and never appears in `Debug` output.
///
/// Each shared-secret attempt copies the secret into a
/// [`DecodingKey`], which `jsonwebtoken` does not zeroize. That copy lives
/// only for the duration of one verification call.
#[derive(Clone, Default)]
pub struct SharedSecret {
    inner: Arc<RwLock<Option<Zeroizing<String>>>>,
}

impl SharedSecret {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot already holding `secret`.
    pub fn with_value(secret: impl Into<String>) -> Self {
        let slot = Self::new();
        slot.set(secret);
        slot
    }

    /// Replace the configured secret.
    pub fn set(&self, secret: impl Into<String>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Zeroizing::new(secret.into()));
    }

    /// Remove the configured secret.
    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    pub fn is_set(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Build the HMAC verification key.
    ///
    /// An unset secret yields a key over the empty string, so the attempt
    /// still runs and rejects anything not signed with an empty key. The
    /// returned key holds a plain copy of the secret; drop it promptly.
    pub(crate) fn decoding_key(&self) -> DecodingKey {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let secret = guard.as_ref().map(|s| s.as_bytes()).unwrap_or_default();
        DecodingKey::from_secret(secret)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_set() { "[REDACTED]" } else { "[UNSET]" };
        f.debug_tuple("SharedSecret").field(&state).finish()
    }
}
