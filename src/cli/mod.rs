pub mod kv_namespace;

use std::path::{Path, PathBuf};

use anyhow::Result;
use structopt::clap::AppSettings;
use structopt::StructOpt;

use crate::commands;
use crate::commands::init::Template;
use crate::http::ApiClient;
use crate::settings::{self, Settings};

use kv_namespace::KvNamespace;

#[derive(Debug, Clone, StructOpt)]
#[structopt(
    name = "cfworker",
    about = "Deploy and manage Cloudflare Workers",
    setting = AppSettings::ArgRequiredElseHelp,
    global_setting = AppSettings::DeriveDisplayOrder,
    global_setting = AppSettings::VersionlessSubcommands
)]
pub struct Cli {
    #[structopt(subcommand)]
    pub command: Command,

    /// Path to the project configuration file
    #[structopt(
        long,
        short = "c",
        default_value = "./.cfworker.json",
        global = true,
        parse(from_os_str)
    )]
    pub config: PathBuf,

    /// Path to the dotenv file holding your credentials
    #[structopt(
        long = "env-file",
        default_value = "./.env",
        global = true,
        parse(from_os_str)
    )]
    pub env_file: PathBuf,
}

#[derive(Debug, Clone, StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub enum Command {
    /// Create a project file and a worker script in the current directory
    Init {
        /// The name of your worker
        #[structopt(index = 1)]
        name: String,

        /// Starting point for the worker script
        #[structopt(
            long,
            short = "t",
            default_value = "edge",
            possible_values = &Template::VARIANTS
        )]
        template: Template,

        /// Overwrite existing files
        #[structopt(long, short = "f")]
        force: bool,
    },

    /// Deploy your worker to Cloudflare
    Deploy {
        /// Validate and print the upload without sending it
        #[structopt(long)]
        dry_run: bool,
    },

    /// Delete your worker from Cloudflare
    Delete {
        /// Do not ask for confirmation
        #[structopt(long, short = "f")]
        force: bool,
    },

    /// Show details about your deployed worker
    Info,

    /// List all workers in your account
    List,

    /// Interact with your Workers KV namespaces
    #[structopt(setting = AppSettings::SubcommandRequiredElseHelp)]
    KvNamespace(KvNamespace),

    /// Check that your API token works
    Whoami,

    /// Interactive setup for your Cloudflare credentials
    ConfigSetup,
}

pub fn run(cli: Cli) -> Result<()> {
    log::info!("{:?}", cli.command);

    match cli.command {
        Command::Init {
            name,
            template,
            force,
        } => commands::init(Path::new("."), &name, template, force),
        Command::Deploy { dry_run } => {
            let settings = Settings::load(&cli.config, &cli.env_file)?;
            let api = ApiClient::new(&settings.credentials, &settings.http)?;
            commands::deploy(&api, &settings, dry_run)
        }
        Command::Delete { force } => {
            let settings = Settings::load(&cli.config, &cli.env_file)?;
            let api = ApiClient::new(&settings.credentials, &settings.http)?;
            commands::delete(&api, &settings.project, force)
        }
        Command::Info => {
            let settings = Settings::load(&cli.config, &cli.env_file)?;
            let api = ApiClient::new(&settings.credentials, &settings.http)?;
            commands::info(&api, &settings.project)
        }
        Command::List => {
            let (credentials, http) = settings::load_account(&cli.env_file)?;
            let api = ApiClient::new(&credentials, &http)?;
            commands::list(&api)
        }
        Command::KvNamespace(kv_namespace) => {
            kv_namespace::kv_namespace(kv_namespace, &cli.config, &cli.env_file)
        }
        Command::Whoami => {
            let (credentials, http) = settings::load_account(&cli.env_file)?;
            let api = ApiClient::new(&credentials, &http)?;
            commands::whoami(&api, &credentials)
        }
        Command::ConfigSetup => commands::config_setup(&cli.env_file),
    }
}
