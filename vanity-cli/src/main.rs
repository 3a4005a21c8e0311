mod cmd;
mod config;

use std::process::ExitCode;

use clap::Command;
use env_logger::{Builder, Env};
use log::error;

fn init_logging() {
    let logging_env = Env::default().filter_or("RUST_LOG", "info");
    Builder::from_env(logging_env).format_timestamp(None).init();
}

fn cli() -> Command {
    // Running without a subcommand behaves like `build`
    cmd::build::add_build_args(Command::new("vanity-url"))
        .about("Generate go vanity import pages for a list of repositories")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(cmd::build::make_subcommand())
}

fn main() -> ExitCode {
    init_logging();

    let matches = cli().get_matches();
    let result = match matches.subcommand() {
        Some(("build", sub_matches)) => cmd::build::execute(sub_matches),
        _ => cmd::build::execute(&matches),
    };

    if let Err(e) = result {
        error!("{e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
