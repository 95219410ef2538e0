use std::path::Path;

use anyhow::Result;
use structopt::StructOpt;

use crate::commands;
use crate::http::ApiClient;
use crate::settings::{self, Settings};

#[derive(Debug, Clone, StructOpt)]
#[structopt(rename_all = "lower")]
pub enum KvNamespace {
    /// List all namespaces on your Cloudflare account
    List,
    /// Create a new namespace named after your worker and the binding
    Create {
        /// The binding for your new namespace
        #[structopt(index = 1)]
        binding: String,
    },
}

pub fn kv_namespace(kv_namespace: KvNamespace, config: &Path, env_file: &Path) -> Result<()> {
    match kv_namespace {
        KvNamespace::List => {
            let (credentials, http) = settings::load_account(env_file)?;
            let api = ApiClient::new(&credentials, &http)?;
            commands::kv_namespace::list(&api)
        }
        KvNamespace::Create { binding } => {
            let settings = Settings::load(config, env_file)?;
            let api = ApiClient::new(&settings.credentials, &settings.http)?;
            commands::kv_namespace::create(&api, &settings.project, &binding).map(|_| ())
        }
    }
}
