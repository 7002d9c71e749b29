//! Deployment environments and certificate file naming.
//!
//! Environments collapse into two certificate families: everything that
//! is not a pre-production environment is verified against production
//! certificates.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A deployment environment, parsed case-sensitively from its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Environment {
    Production,
    Qa,
    Test,
    Development,
    /// Any name outside the known set. Treated as production.
    Other(String),
}

impl Environment {
    /// Parse an environment name. Never fails; unknown names become
    /// [`Environment::Other`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "production" => Self::Production,
            "qa" => Self::Qa,
            "test" => Self::Test,
            "development" => Self::Development,
            other => Self::Other(other.to_string()),
        }
    }

    /// The certificate family used to verify tokens in this environment.
    pub fn family(&self) -> CertFamily {
        match self {
            Self::Qa | Self::Test | Self::Development => CertFamily::Qa,
            Self::Production | Self::Other(_) => CertFamily::Production,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Production => "production",
            Self::Qa => "qa",
            Self::Test => "test",
            Self::Development => "development",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<&str> for Environment {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of certificates shared by one class of environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertFamily {
    Qa,
    Production,
}

impl CertFamily {
    /// File stem of the family's primary certificate.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Qa => "qa",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for CertFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Which certificate of a family to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateSlot {
    Primary,
    Secondary,
}

impl fmt::Display for CertificateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

/// Certificate file extension.
const CERT_EXTENSION: &str = "cer";

/// Build the certificate file name for a family and slot.
///
/// The secondary certificate carries a `_secondary` suffix before the
/// extension: `qa.cer`, `qa_secondary.cer`. `prefix` is prepended
/// verbatim and is usually empty.
pub fn certificate_file_name(prefix: &str, family: CertFamily, slot: CertificateSlot) -> String {
    let suffix = match slot {
        CertificateSlot::Primary => "",
        CertificateSlot::Secondary => "_secondary",
    };
    format!("{prefix}{}{suffix}.{CERT_EXTENSION}", family.file_stem())
}
