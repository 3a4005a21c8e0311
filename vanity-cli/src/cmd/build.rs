use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::{info, warn};
use vanity_core::{SiteGenerator, Templates};

use crate::config::VanityConfig;

pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (default is vanity.yaml in the current directory)"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("DIR")
                .help("Output directory, recreated on every run (default is build)"),
        )
        .arg(
            Arg::new("templates")
                .short('t')
                .long("templates")
                .value_name("DIR")
                .help("Directory with index.tmpl and redir.tmpl to use instead of the bundled templates"),
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build"))
        .about("Generate the index page and one redirect page per repository")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let vanity_config = VanityConfig::load(args)?;
    let build_config = &vanity_config.build;

    let mut generator = SiteGenerator::new().output_dir(&build_config.out);
    if let Some(dir) = &build_config.templates {
        let templates = Templates::from_dir(dir)
            .with_context(|| format!("failed loading templates from {dir}"))?;
        generator = generator.templates(templates);
    }

    let report = generator.generate(&vanity_config.site)?;

    if report.is_clean() {
        info!("site built successfully in {}", report.root.display());
    } else {
        warn!(
            "site built in {} but {} page(s) failed, see errors above",
            report.root.display(),
            report.failures.len()
        );
    }

    Ok(())
}
