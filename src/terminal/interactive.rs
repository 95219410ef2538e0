use anyhow::{anyhow, Result};

// For interactively handling reading in a string
pub fn get_user_input(prompt_string: &str) -> Result<String> {
    println!("{}", prompt_string);
    let input: String =
        try_read!("{}\n").map_err(|e| anyhow!("could not read from stdin: {:?}", e))?;
    Ok(strip_trailing_whitespace(input))
}

// Like `get_user_input`, but nothing typed is echoed back.
pub fn get_secret_input(prompt_string: &str) -> Result<String> {
    let input = dialoguer::Password::new()
        .with_prompt(prompt_string)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| anyhow!("could not read from the terminal: {}", e))?;
    Ok(strip_trailing_whitespace(input))
}

fn strip_trailing_whitespace(mut input: String) -> String {
    input.truncate(input.trim_end().len());
    input
}

// Truncate all "yes", "no" responses for interactive prompt to just "y" or "n".
const INTERACTIVE_RESPONSE_LEN: usize = 1;
const YES: &str = "y";
const NO: &str = "n";

// For interactively handling destructive commands (and discouraging accidental deletes).
// Input like "yes", "Yes", "no", "No" will be accepted.
pub fn confirm(prompt_string: &str) -> Result<bool> {
    let response = get_user_input(&format!("{} [y/n]", prompt_string))?;
    parse_confirmation(&response)
}

fn parse_confirmation(response: &str) -> Result<bool> {
    let mut response: String = response.split_whitespace().collect();
    response.make_ascii_lowercase();
    response.truncate(INTERACTIVE_RESPONSE_LEN);
    match response.as_ref() {
        YES => Ok(true),
        NO => Ok(false),
        _ => anyhow::bail!("Response must either be \"y\" for yes or \"n\" for no"),
    }
}
