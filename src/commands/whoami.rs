use anyhow::Result;

use crate::http::{TokenStatus, WorkersApi};
use crate::settings::Credentials;
use crate::terminal::message::{Message, StdOut};
use crate::terminal::styles;

use super::remote_error;

pub fn whoami(api: &impl WorkersApi, credentials: &Credentials) -> Result<()> {
    let status = validate_token(api)?;

    StdOut::success(&format!(
        "Your API token {} is {} for account {}",
        styles::dim(&status.id),
        status.status,
        styles::highlight(&credentials.account_id)
    ));
    if let Some(expires_on) = &status.expires_on {
        StdOut::info(&format!("The token expires on {}", expires_on));
    }

    Ok(())
}

/// Checks `/user/tokens/verify` so bad credentials fail with a clear message.
pub fn validate_token(api: &impl WorkersApi) -> Result<TokenStatus> {
    let status = api.verify_token().map_err(|e| {
        anyhow::anyhow!(
            "Auth check failed. Please make sure your API token is correct.\n{}",
            remote_error(e)
        )
    })?;

    if !status.is_active() {
        anyhow::bail!(
            "Auth check failed. Your token has status \"{}\", not \"active\".",
            status.status
        );
    }

    Ok(status)
}
