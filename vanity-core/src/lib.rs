//! Static page generation for go vanity import paths.
//!
//! A [`Config`] lists repositories; [`SiteGenerator`] turns it into an
//! `index.html` plus one `<path>.html` redirect page per repository.

pub mod builder;
pub mod config;
pub mod output;
pub mod renderer;
pub mod template;

// Re-export main types
pub use builder::{BuildError, BuildReport, PageError, PageFailure, SiteGenerator};
pub use config::{Config, Protocol, Repository};
pub use renderer::{RenderError, Renderer};
pub use template::{TemplateError, Templates, UrlError, url_without_protocol};
