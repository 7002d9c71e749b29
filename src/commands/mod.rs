//! Command handlers for each CLI subcommand.
//!
//! Each subcommand is implemented in its own module and exposes
//! a single `execute` function that receives the parsed arguments.

pub mod decode;
pub mod resolve;

use std::io::{self, IsTerminal, Read};

use token_decoder::{DecoderConfig, TokenDecoderError};
use zeroize::Zeroizing;

use crate::cli::CertArgs;

/// Build a decoder configuration from the certificate flags.
pub(crate) fn decoder_config(certs: &CertArgs) -> DecoderConfig {
    let mut config = DecoderConfig::default().with_file_prefix(certs.cert_prefix.as_str());
    if let Some(dir) = &certs.cert_dir {
        config = config.with_cert_dir(dir);
    }
    config
}

/// Resolve the token from the argument, an environment variable, or stdin,
/// in that order. Surrounding whitespace is trimmed.
pub(crate) fn read_token(
    token: Option<&str>,
    token_env: Option<&str>,
) -> Result<Zeroizing<String>, TokenDecoderError> {
    let raw = match (token, token_env) {
        (Some(token), _) => Zeroizing::new(token.to_string()),
        (None, Some(name)) => read_env_var(name)?,
        (None, None) => read_stdin()?,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TokenDecoderError::NoTokenProvided);
    }
    Ok(Zeroizing::new(trimmed.to_string()))
}

/// Read a secret value from an environment variable.
///
/// Rejects names that the platform cannot look up (empty, or containing
/// `=` or NUL) before touching the environment.
pub(crate) fn read_env_var(name: &str) -> Result<Zeroizing<String>, TokenDecoderError> {
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        return Err(TokenDecoderError::InvalidEnvVarName {
            name: name.to_string(),
        });
    }

    std::env::var(name)
        .map(Zeroizing::new)
        .map_err(|_| TokenDecoderError::EnvVarNotFound {
            name: name.to_string(),
        })
}

/// Read the token from stdin, unless stdin is an interactive terminal.
fn read_stdin() -> Result<Zeroizing<String>, TokenDecoderError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Zeroizing::new(String::new()));
    }
    read_all(stdin.lock())
}

fn read_all(mut reader: impl Read) -> Result<Zeroizing<String>, TokenDecoderError> {
    let mut buffer = Zeroizing::new(String::new());
    reader
        .read_to_string(&mut buffer)
        .map_err(|e| TokenDecoderError::StdinRead {
            reason: match e.kind() {
                io::ErrorKind::InvalidData => "input is not valid UTF-8".to_string(),
                kind => kind.to_string(),
            },
        })?;
    Ok(buffer)
}
