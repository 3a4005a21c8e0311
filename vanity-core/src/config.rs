use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Branch used for source links when a repository leaves it empty.
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub repos: Vec<Repository>,
}

impl Config {
    /// Copy of the config with per-repository defaults applied.
    pub fn normalized(&self) -> Self {
        Self {
            repos: self.repos.iter().map(Repository::normalized).collect(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Repository {
    pub url: String,
    pub branch: String,
    pub protocol: Protocol,
    pub path: String,
    // Templates see `vanity_url`; only the config file uses the hyphen.
    #[serde(rename(deserialize = "vanity-url"))]
    pub vanity_url: String,
    pub description: String,
    pub hidden: bool,
}

impl Repository {
    pub fn normalized(&self) -> Self {
        let mut repo = self.clone();
        if repo.branch.is_empty() {
            repo.branch = DEFAULT_BRANCH.to_string();
        }
        repo
    }

    /// File the redirect page is written to, relative to the output root.
    pub fn output_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.html", self.path))
    }
}

/// Version control system advertised in the `go-import` meta tag.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Git,
    Hg,
    Svn,
    Bzr,
    Fossil,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Git => "git",
            Protocol::Hg => "hg",
            Protocol::Svn => "svn",
            Protocol::Bzr => "bzr",
            Protocol::Fossil => "fossil",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
