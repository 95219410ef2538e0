use reqwest::StatusCode;

use crate::error::RemoteError;
use crate::terminal::emoji;

/// Renders a failed request for the terminal: each platform error on its own
/// line, followed by a hint when the code is one we know how to explain.
pub fn format_error(e: &RemoteError) -> String {
    match e {
        RemoteError::Api { status, errors } => {
            let mut complete_err = String::new();
            if let Some(context) = status_code_context(*status) {
                complete_err.push_str(&format!("{} {}\n", emoji::WARN, context));
            }
            for error in errors {
                complete_err.push_str(&format!(
                    "{} Code {}: {}\n",
                    emoji::WARN,
                    error.code,
                    error.message
                ));

                let suggestion = error_help(error.code);
                if !suggestion.is_empty() {
                    complete_err.push_str(&format!("{} {}\n", emoji::SLEUTH, suggestion));
                }
            }
            if errors.is_empty() {
                complete_err.push_str(&format!("{} Error: {}\n", emoji::WARN, e));
            }
            complete_err.trim_end().to_string()
        }
        RemoteError::InvalidResponse { status, .. } => match status_code_context(*status) {
            Some(context) => format!("{} {}\n{} Error: {}", emoji::WARN, context, emoji::WARN, e),
            None => format!("{} Error: {}", emoji::WARN, e),
        },
        _ => format!("{} Error: {}", emoji::WARN, e),
    }
}

// For cases where the API gateway answers with a bare status code and no
// platform error code.
pub fn status_code_context(status: StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => Some("Returned status code 413, Payload Too Large. Please make sure your script is less than the upload limit for your plan"),
        StatusCode::GATEWAY_TIMEOUT => Some("Returned status code 504, Gateway Timeout. Please try again in a few seconds"),
        _ => None,
    }
}

fn error_help(error_code: u32) -> &'static str {
    match error_code {
        // unauthorized
        10000 => "Make sure CLOUDFLARE_API_TOKEN is valid and has permission to edit Workers on this account. Run `cfworker config-setup` to enter a new one",
        // script not found
        10007 => "No worker with that name exists on this account. Check `worker_name` in your configuration file and CLOUDFLARE_ACCOUNT_ID",
        10020 => "A worker with a different name was previously deployed to this route. Change `worker_name` to match it, or remove the route at https://dash.cloudflare.com",
        10034 => "You need to verify your account's email address before you can deploy. You can do this by checking your email or logging in to https://dash.cloudflare.com",
        _ => "",
    }
}
