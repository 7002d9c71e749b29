//! Handler for the `resolve` subcommand.
//!
//! Prints the certificate path an environment resolves to. Nothing is
//! read from disk.

use anyhow::Result;
use token_decoder::{CertificateSlot, TokenDecoder};

use super::decoder_config;
use crate::cli::ResolveArgs;

/// Execute the `resolve` subcommand with the given arguments.
pub fn execute(args: &ResolveArgs) -> Result<()> {
    let slot = if args.secondary {
        CertificateSlot::Secondary
    } else {
        CertificateSlot::Primary
    };

    let decoder = TokenDecoder::new(decoder_config(&args.certs));
    println!(
        "{}",
        decoder.certificate_path(&args.environment, slot).display()
    );
    Ok(())
}
