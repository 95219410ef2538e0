#![cfg_attr(feature = "strict", deny(warnings))]

use std::process;

use structopt::StructOpt;

use cfworker::cli::{self, Cli};
use cfworker::terminal::message::{Message, StdErr};

fn main() {
    env_logger::init();

    let cli = Cli::from_args();
    if let Err(e) = cli::run(cli) {
        log::debug!("{:?}", e);
        StdErr::user_error(&format!("{:#}", e));
        process::exit(1);
    }
}
