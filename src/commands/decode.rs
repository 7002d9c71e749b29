//! Handler for the `decode` subcommand.
//!
//! Verifies a token through the credential fallback chain and prints its
//! claims. Supports reading the token from a CLI argument, environment
//! variable, or stdin, and the shared secret from a flag or environment
//! variable.

use anyhow::Result;
use token_decoder::TokenDecoder;

use super::{decoder_config, read_env_var, read_token};
use crate::cli::DecodeArgs;
use crate::display::claims_printer;

/// Execute the `decode` subcommand with the given arguments.
pub fn execute(args: &DecodeArgs) -> Result<()> {
    let token = read_token(args.token.as_deref(), args.token_env.as_deref())?;

    let mut config = decoder_config(&args.certs);
    config.shared_secret = match (&args.secret, &args.secret_env) {
        (Some(secret), _) => Some(secret.clone()),
        (None, Some(name)) => Some(read_env_var(name)?),
        (None, None) => None,
    };

    let decoder = TokenDecoder::new(config);
    let verified = decoder.verify(&token, &args.environment)?;

    let output = if args.json {
        claims_printer::render_json(&verified)?
    } else {
        claims_printer::render_human(&verified)?
    };
    println!("{output}");
    Ok(())
}
