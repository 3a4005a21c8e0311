use std::collections::HashMap;
use std::path::Path;

use log::warn;
use tera::{Tera, Value};
use url::Url;

pub const INDEX_TEMPLATE: &str = "index.tmpl";
pub const REDIRECT_TEMPLATE: &str = "redir.tmpl";

const BUNDLED_INDEX: &str = include_str!("../templates/index.tmpl");
const BUNDLED_REDIRECT: &str = include_str!("../templates/redir.tmpl");

#[derive(Debug)]
pub enum TemplateError {
    TeraError(tera::Error),
    IoError(std::io::Error),
}

impl From<tera::Error> for TemplateError {
    fn from(err: tera::Error) -> Self {
        TemplateError::TeraError(err)
    }
}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        TemplateError::IoError(err)
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::TeraError(e) => write!(f, "Template error: {}", error_chain(e)),
            TemplateError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Join an error and all of its sources into one line.
///
/// tera keeps the useful part (parse position, missing variable, `throw`
/// message) in the source chain rather than the top-level message.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();

    while let Some(err) = source {
        chain.push(err.to_string());
        source = err.source();
    }

    chain.join(": ")
}

#[derive(Debug)]
pub enum UrlError {
    Parse(url::ParseError),
    MissingHost(String),
}

impl From<url::ParseError> for UrlError {
    fn from(err: url::ParseError) -> Self {
        UrlError::Parse(err)
    }
}

impl std::fmt::Display for UrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlError::Parse(e) => write!(f, "URL parse error: {}", e),
            UrlError::MissingHost(s) => write!(f, "URL has no host: {}", s),
        }
    }
}

impl std::error::Error for UrlError {}

/// The compiled page templates for one run.
///
/// Always holds exactly [`INDEX_TEMPLATE`] and [`REDIRECT_TEMPLATE`], with the
/// `url_without_protocol` helper registered.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compile the templates shipped with the crate.
    pub fn bundled() -> Result<Self, TemplateError> {
        Self::from_sources(BUNDLED_INDEX, BUNDLED_REDIRECT)
    }

    pub fn from_sources(index: &str, redirect: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.register_function("url_without_protocol", url_without_protocol_fn);
        tera.add_raw_templates(vec![(INDEX_TEMPLATE, index), (REDIRECT_TEMPLATE, redirect)])?;

        Ok(Self { tera })
    }

    /// Compile `index.tmpl` and `redir.tmpl` read from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let index = std::fs::read_to_string(dir.join(INDEX_TEMPLATE))?;
        let redirect = std::fs::read_to_string(dir.join(REDIRECT_TEMPLATE))?;

        Self::from_sources(&index, &redirect)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }

    pub(crate) fn tera(&self) -> &Tera {
        &self.tera
    }
}

/// Strip the scheme from `s`, keeping host, port and path.
///
/// `https://example.com/a/b` becomes `example.com/a/b`. Trailing slashes are
/// dropped, so `https://example.com/go/` becomes `example.com/go`. Input
/// without a scheme, like `example.com/go`, is read as if it were https.
pub fn url_without_protocol(s: &str) -> Result<String, UrlError> {
    let s = s.trim();
    let url = match Url::parse(s) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{s}"))?,
        parsed => parsed?,
    };
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| UrlError::MissingHost(s.to_string()))?;

    let mut out = host.to_string();
    if let Some(port) = url.port() {
        out.push_str(&format!(":{port}"));
    }
    out.push_str(url.path().trim_end_matches('/'));

    Ok(out)
}

/// Template-facing wrapper around [`url_without_protocol`].
///
/// Usage: `{{ url_without_protocol(url=vanity_url) }}`. Yields `null` when
/// the URL cannot be displayed, which renders empty and tests false.
fn url_without_protocol_fn(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = args
        .get("url")
        .and_then(|v| v.as_str())
        .ok_or_else(|| tera::Error::msg("url_without_protocol requires a string 'url' parameter"))?;

    match url_without_protocol(raw) {
        Ok(stripped) => Ok(Value::String(stripped)),
        Err(e) => {
            warn!("failed stripping protocol from url {raw:?}: {e}");
            Ok(Value::Null)
        }
    }
}
