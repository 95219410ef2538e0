use std::path::Path;

use anyhow::Result;

use crate::http::ApiClient;
use crate::settings::{Credentials, HttpConfig};
use crate::terminal::message::{Message, StdOut};
use crate::terminal::{interactive, styles};

use super::whoami::validate_token;

/// Prompts for credentials, stores them in `secrets_path` and checks that
/// they work.
pub fn config_setup(secrets_path: &Path) -> Result<()> {
    println!("{}\n", styles::bold("Cloudflare Credentials Setup"));
    println!("You'll need:");
    println!("1. Account ID - Found in your Cloudflare dashboard");
    println!(
        "2. API Token - Create one at {}",
        styles::url("https://dash.cloudflare.com/profile/api-tokens")
    );
    println!("   Required permissions: Workers Scripts:Edit\n");

    let credentials =
        prompt_credentials(interactive::get_user_input, interactive::get_secret_input)?;
    credentials.write(secrets_path)?;
    StdOut::success(&format!(
        "Credentials saved to {}",
        secrets_path.display()
    ));

    StdOut::info("Verifying that provided credentials are valid...");
    let http = HttpConfig::new(Some(secrets_path))?;
    let api = ApiClient::new(&credentials, &http)?;
    validate_token(&api)?;
    StdOut::success("Credentials verified successfully!");

    Ok(())
}

// The token only ever goes through `read_secret`.
fn prompt_credentials<I, S>(read_input: I, read_secret: S) -> Result<Credentials>
where
    I: Fn(&str) -> Result<String>,
    S: Fn(&str) -> Result<String>,
{
    let account_id = read_input("Enter your Cloudflare Account ID:")?;
    let api_token = read_secret("Enter your Cloudflare API Token")?;
    if account_id.is_empty() || api_token.is_empty() {
        anyhow::bail!("Both an account ID and an API token are required");
    }

    Ok(Credentials {
        account_id,
        api_token,
    })
}
