use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::config::Config;
use crate::output::{self, OutputError};
use crate::renderer::{RenderError, Renderer};
use crate::template::{INDEX_TEMPLATE, REDIRECT_TEMPLATE, TemplateError, Templates};

pub const INDEX_FILE: &str = "index.html";

/// Errors that stop a build before any page can be produced.
#[derive(Debug)]
pub enum BuildError {
    TemplateError(TemplateError),
    OutputError(OutputError),
}

impl From<TemplateError> for BuildError {
    fn from(err: TemplateError) -> Self {
        BuildError::TemplateError(err)
    }
}

impl From<OutputError> for BuildError {
    fn from(err: OutputError) -> Self {
        BuildError::OutputError(err)
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::TemplateError(e) => write!(f, "Failed compiling templates: {}", e),
            BuildError::OutputError(e) => write!(f, "Failed preparing output directory: {}", e),
        }
    }
}

impl std::error::Error for BuildError {}

/// Why a single page was not produced.
#[derive(Debug)]
pub enum PageError {
    Render(RenderError),
    Write(OutputError),
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::Render(e) => write!(f, "render failed: {}", e),
            PageError::Write(e) => write!(f, "write failed: {}", e),
        }
    }
}

#[derive(Debug)]
pub struct PageFailure {
    /// Template that was being executed.
    pub template: &'static str,
    /// Repository path, or `None` for the index page.
    pub repo: Option<String>,
    /// Output file relative to the root.
    pub target: PathBuf,
    pub error: PageError,
}

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub root: PathBuf,
    pub written: Vec<PathBuf>,
    pub failures: Vec<PageFailure>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Write a rendered page, or log and record whichever step failed.
    fn record(
        &mut self,
        template: &'static str,
        repo: Option<&str>,
        target: PathBuf,
        rendered: Result<Vec<u8>, RenderError>,
    ) {
        let result = rendered
            .map_err(PageError::Render)
            .and_then(|html| output::write(&self.root, &target, &html).map_err(PageError::Write));

        match result {
            Ok(path) => {
                debug!("wrote {}", path.display());
                self.written.push(path);
            }
            Err(err) => {
                error!(
                    "skipping {} (template {}, repo {}): {}",
                    target.display(),
                    template,
                    repo.unwrap_or("-"),
                    err
                );
                self.failures.push(PageFailure {
                    template,
                    repo: repo.map(str::to_string),
                    target,
                    error: err,
                });
            }
        }
    }
}

/// Generates the index page and one redirect page per repository.
pub struct SiteGenerator {
    output_dir: PathBuf,
    templates: Option<Templates>,
}

impl Default for SiteGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteGenerator {
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from("build"),
            templates: None,
        }
    }

    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Use these templates instead of the bundled ones.
    pub fn templates(mut self, templates: Templates) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Run a full build of `config` into the output directory.
    ///
    /// Template compilation and root preparation are fatal. Every page after
    /// that is independent: a failed page is logged, recorded in the report
    /// and skipped.
    pub fn generate(self, config: &Config) -> Result<BuildReport, BuildError> {
        let templates = match self.templates {
            Some(templates) => templates,
            None => Templates::bundled()?,
        };
        let root = output::prepare_root(&self.output_dir)?;
        info!("writing site to {}", root.display());

        let renderer = Renderer::new(&templates);
        let config = config.normalized();
        let mut report = BuildReport {
            root,
            ..Default::default()
        };

        let index = renderer.render(INDEX_TEMPLATE, &config);
        report.record(INDEX_TEMPLATE, None, PathBuf::from(INDEX_FILE), index);

        for repo in &config.repos {
            let page = renderer.render(REDIRECT_TEMPLATE, repo);
            report.record(REDIRECT_TEMPLATE, Some(repo.path.as_str()), repo.output_file(), page);
        }

        info!(
            "wrote {} page(s), {} failed",
            report.written.len(),
            report.failures.len()
        );
        Ok(report)
    }
}
