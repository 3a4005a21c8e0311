use anyhow::{Context, Result};
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name searched for in the current directory when no config file is given.
const DEFAULT_CONFIG_NAME: &str = "vanity";

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VanityConfig {
    /// Build configuration
    pub build: BuildConfig,
    /// Repositories to generate pages for (from vanity-core)
    #[serde(flatten)]
    pub site: vanity_core::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Output directory for generated pages
    pub out: String,
    /// Directory with replacement templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            out: "build".to_string(),
            templates: None,
        }
    }
}

impl Default for VanityConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            site: vanity_core::Config::default(),
        }
    }
}

impl VanityConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (VANITY_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    ///
    /// The configuration file is required: either the one named by `--config`
    /// or `vanity.*` in the current directory.
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        let defaults = Self::default();
        builder = builder.add_source(ConfigBuilder::try_from(&defaults)?);

        // 2. Add the configuration file
        let config_file = args.get_one::<String>("config");
        let config_name = match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(Path::new(path)));
                path.clone()
            }
            None => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_NAME));
                format!("{DEFAULT_CONFIG_NAME}.*")
            }
        };

        // 3. Add environment variables with VANITY_ prefix
        builder = builder.add_source(
            Environment::with_prefix("VANITY")
                .prefix_separator("_")
                .separator("__"), // VANITY_BUILD__OUT
        );

        // 4. Override with CLI arguments (highest priority)
        let mut cli_overrides = std::collections::HashMap::new();

        if let Some(out) = args.get_one::<String>("out") {
            cli_overrides.insert("build.out".to_string(), out.clone());
        }
        if let Some(templates) = args.get_one::<String>("templates") {
            cli_overrides.insert("build.templates".to_string(), templates.clone());
        }

        if !cli_overrides.is_empty() {
            builder = builder.add_source(ConfigBuilder::try_from(&cli_overrides)?);
        }

        // Build and deserialize
        let config = builder
            .build()
            .with_context(|| format!("failed loading config {config_name}"))?;
        let vanity_config: VanityConfig = config
            .try_deserialize()
            .with_context(|| format!("failed parsing config {config_name}"))?;

        info!(
            "config loaded from {config_name} ({} repositories)",
            vanity_config.site.repos.len()
        );

        Ok(vanity_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};
    use tempfile::TempDir;
    use vanity_core::Protocol;

    fn app() -> Command {
        Command::new("test")
            .arg(Arg::new("config").long("config").value_name("FILE"))
            .arg(Arg::new("out").long("out").value_name("DIR"))
            .arg(Arg::new("templates").long("templates").value_name("DIR"))
    }

    fn write_config(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    const SITE: &str = r#"
repos:
  - url: https://github.com/acme/tool
    branch: develop
    path: tool
    vanity-url: https://go.acme.dev
    description: A tool
  - url: https://hg.acme.dev/lib
    protocol: hg
    path: lib
    vanity-url: https://go.acme.dev
    hidden: true
"#;

    #[test]
    fn test_default_config() {
        let config = VanityConfig::default();
        assert_eq!(config.build.out, "build");
        assert!(config.build.templates.is_none());
        assert!(config.site.repos.is_empty());
    }

    #[test]
    fn test_loads_repositories_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "vanity.yaml", SITE);

        let matches = app().try_get_matches_from(vec!["test", "--config", &path]).unwrap();
        let config = VanityConfig::load(&matches).unwrap();

        assert_eq!(config.build.out, "build");
        let repos = &config.site.repos;
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].path, "tool");
        assert_eq!(repos[0].branch, "develop");
        assert_eq!(repos[0].vanity_url, "https://go.acme.dev");
        assert_eq!(repos[0].protocol, Protocol::Git);
        assert!(!repos[0].hidden);
        assert_eq!(repos[1].path, "lib");
        assert_eq!(repos[1].protocol, Protocol::Hg);
        assert_eq!(repos[1].branch, "");
        assert!(repos[1].hidden);
    }

    #[test]
    fn test_file_build_section_is_used() {
        let dir = TempDir::new().unwrap();
        let contents = format!("build:\n  out: public\n{SITE}");
        let path = write_config(&dir, "vanity.yaml", &contents);

        let matches = app().try_get_matches_from(vec!["test", "--config", &path]).unwrap();
        let config = VanityConfig::load(&matches).unwrap();

        assert_eq!(config.build.out, "public");
    }

    #[test]
    fn test_cli_args_override() {
        let dir = TempDir::new().unwrap();
        let contents = format!("build:\n  out: public\n{SITE}");
        let path = write_config(&dir, "vanity.yaml", &contents);

        let matches = app()
            .try_get_matches_from(vec![
                "test",
                "--config", &path,
                "--out", "/custom/output",
                "--templates", "/custom/theme",
            ])
            .unwrap();
        let config = VanityConfig::load(&matches).unwrap();

        assert_eq!(config.build.out, "/custom/output");
        assert_eq!(config.build.templates.as_deref(), Some("/custom/theme"));
        assert_eq!(config.site.repos.len(), 2);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yaml");

        let matches = app()
            .try_get_matches_from(vec!["test", "--config", path.to_str().unwrap()])
            .unwrap();

        assert!(VanityConfig::load(&matches).is_err());
    }

    #[test]
    fn test_unparseable_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "vanity.yaml", "repos: [unclosed");

        let matches = app().try_get_matches_from(vec!["test", "--config", &path]).unwrap();

        assert!(VanityConfig::load(&matches).is_err());
    }

    #[test]
    fn test_unknown_protocol_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "vanity.yaml",
            "repos:\n  - path: x\n    protocol: cvs\n",
        );

        let matches = app().try_get_matches_from(vec!["test", "--config", &path]).unwrap();

        assert!(VanityConfig::load(&matches).is_err());
    }
}
