//! Rendering of verified claims.
//!
//! Human mode prints the claims as indented JSON followed by the
//! credential that verified the token. JSON mode emits a single object
//! with `header`, `claims` and `credential` keys.

use anyhow::Result;
use serde_json::{Value, json};
use token_decoder::Verified;

/// Render a verified token for a terminal.
pub fn render_human(verified: &Verified) -> Result<String> {
    let claims = serde_json::to_string_pretty(verified.claims.as_map())?;
    Ok(format!(
        "--- Claims ---\n{claims}\n\nVerified with: {}",
        verified.credential
    ))
}

/// Render a verified token as a single compact JSON document.
pub fn render_json(verified: &Verified) -> Result<String> {
    let document = json!({
        "header": serde_json::to_value(&verified.header)?,
        "claims": Value::Object(verified.claims.as_map().clone()),
        "credential": verified.credential.as_str(),
    });
    Ok(serde_json::to_string(&document)?)
}
