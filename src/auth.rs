use std::io::IsTerminal;

use secrecy::SecretString;

use crate::error::KeywayError;

const TOKEN_VAR: &str = "KEYWAY_TOKEN";

/// Resolve the API token: `KEYWAY_TOKEN`, else a hidden prompt when stdin is a
/// terminal, else `NotLoggedIn`.
pub fn ensure_token() -> Result<SecretString, KeywayError> {
    if let Some(token) = token_from_env(std::env::var(TOKEN_VAR).ok()) {
        tracing::debug!("using token from {}", TOKEN_VAR);
        return Ok(token);
    }

    if !std::io::stdin().is_terminal() {
        return Err(KeywayError::NotLoggedIn);
    }

    let token = rpassword::prompt_password("Keyway API token: ")?;
    token_from_env(Some(token)).ok_or(KeywayError::NotLoggedIn)
}

fn token_from_env(value: Option<String>) -> Option<SecretString> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::new)
}
