pub mod config;
pub mod delete;
pub mod deploy;
pub mod info;
pub mod init;
pub mod kv_namespace;
pub mod list;
pub mod whoami;

pub use config::config_setup;
pub use delete::delete;
pub use deploy::deploy;
pub use info::info;
pub use init::init;
pub use list::list;
pub use whoami::whoami;

use crate::error::RemoteError;
use crate::http;

/// Turns a failed request into a printable error, keeping the platform's
/// messages and any hint we have for them.
pub(crate) fn remote_error(e: RemoteError) -> anyhow::Error {
    anyhow::anyhow!("{}", http::format_error(&e))
}
