//! CLI argument definitions for token-decoder.
//!
//! Uses `clap` derive macros to define the command-line interface.
//! Each subcommand has its own argument struct for type-safe parsing.
//!
//! # Security
//!
//! `DecodeArgs` implements a custom `Debug` to redact the token and the
//! shared secret and prevent accidental leakage through debug formatting,
//! error chains, or logging.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use zeroize::Zeroizing;

/// Verify signed tokens against environment-specific certificates,
/// falling back to a shared HMAC secret.
#[derive(Debug, Parser)]
#[command(name = "token-decoder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Verify a token and print its claims.
    Decode(DecodeArgs),

    /// Print the certificate file used for an environment.
    Resolve(ResolveArgs),
}

/// Where certificates are stored.
#[derive(Debug, clap::Args)]
pub struct CertArgs {
    /// Directory containing the certificate files.
    #[arg(long, value_name = "DIR")]
    pub cert_dir: Option<PathBuf>,

    /// Prefix prepended to every certificate file name (e.g. "nfg_").
    #[arg(long, value_name = "PREFIX", default_value = "")]
    pub cert_prefix: String,
}

/// Arguments for the `decode` subcommand.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// The token to decode. If omitted, reads from stdin.
    pub token: Option<String>,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub token_env: Option<String>,

    /// Deployment environment. "qa", "test" and "development" use the QA
    /// certificates; anything else uses production.
    #[arg(short, long, value_name = "ENV", default_value = "production")]
    pub environment: String,

    /// HMAC shared secret for tokens that are not certificate-signed.
    ///
    /// WARNING: Passing secrets via CLI arguments may expose them in shell
    /// history. Prefer using --secret-env instead.
    #[arg(
        long,
        value_name = "SECRET",
        value_parser = parse_zeroizing_string,
        conflicts_with = "secret_env"
    )]
    pub secret: Option<Zeroizing<String>>,

    /// Read the HMAC shared secret from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME")]
    pub secret_env: Option<String>,

    #[command(flatten)]
    pub certs: CertArgs,

    /// Output raw JSON (machine-readable).
    #[arg(long)]
    pub json: bool,
}

/// Parse a string into a `Zeroizing<String>` for secure CLI arguments.
fn parse_zeroizing_string(s: &str) -> Result<Zeroizing<String>, std::convert::Infallible> {
    Ok(Zeroizing::new(s.to_string()))
}

/// Custom `Debug` that redacts token and secret fields to prevent
/// accidental leakage through debug formatting or error chains.
impl fmt::Debug for DecodeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeArgs")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_env", &self.token_env)
            .field("environment", &self.environment)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("secret_env", &self.secret_env)
            .field("certs", &self.certs)
            .field("json", &self.json)
            .finish()
    }
}

/// Arguments for the `resolve` subcommand.
#[derive(Debug, clap::Args)]
pub struct ResolveArgs {
    /// Deployment environment.
    #[arg(short, long, value_name = "ENV", default_value = "production")]
    pub environment: String,

    /// Resolve the secondary certificate instead of the primary one.
    #[arg(long)]
    pub secondary: bool,

    #[command(flatten)]
    pub certs: CertArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_args_debug_redacts_token_and_secret() {
        let cli = Cli::parse_from([
            "token-decoder",
            "decode",
            "eyJhbGciOiJIUzI1NiJ9.e30.c2ln",
            "--secret",
            "very-secret-value",
        ]);
        let debug_output = format!("{cli:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("eyJhbGciOiJIUzI1NiJ9"));
        assert!(!debug_output.contains("very-secret-value"));
    }

    #[test]
    fn test_decode_defaults_to_production() {
        let cli = Cli::parse_from(["token-decoder", "decode", "token"]);
        let Commands::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.environment, "production");
        assert!(args.certs.cert_dir.is_none());
        assert!(args.certs.cert_prefix.is_empty());
    }

    #[test]
    fn test_secret_and_secret_env_conflict() {
        let result = Cli::try_parse_from([
            "token-decoder",
            "decode",
            "token",
            "--secret",
            "a",
            "--secret-env",
            "B",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_parses_secondary_flag() {
        let cli = Cli::parse_from(["token-decoder", "resolve", "-e", "qa", "--secondary"]);
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.environment, "qa");
        assert!(args.secondary);
    }
}
