//! Repository identification.

use std::env;
use std::fmt;
use std::process::Command;
use std::str::FromStr;

use crate::GithubError;

/// An `owner/name` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// Determines the repository to analyze.
    ///
    /// Resolution order: the `GH_REPO` environment variable, then the
    /// `origin` remote of the enclosing git checkout.
    pub fn current() -> Result<Self, GithubError> {
        if let Ok(value) = env::var("GH_REPO") {
            return value.parse();
        }

        let output = Command::new("git")
            .args(["remote", "get-url", "origin"])
            .output()
            .map_err(|err| GithubError::Repository(format!("failed to run git: {err}")))?;
        if !output.status.success() {
            return Err(GithubError::Repository(
                "not inside a git checkout with an origin remote (set GH_REPO or pass --repo)"
                    .to_string(),
            ));
        }

        let url = String::from_utf8_lossy(&output.stdout);
        let url = url.trim();
        parse_remote_url(url).ok_or_else(|| {
            GithubError::Repository(format!("unrecognized origin remote URL: {url}"))
        })
    }
}

impl FromStr for Repository {
    type Err = GithubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| GithubError::Repository(format!("expected owner/name, got {s:?}")))?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(GithubError::Repository(format!(
                "expected owner/name, got {s:?}"
            )));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Extracts `owner/name` from the common GitHub remote URL forms:
/// `https://github.com/owner/name(.git)`, `git@github.com:owner/name(.git)`,
/// and `ssh://git@github.com/owner/name(.git)`.
fn parse_remote_url(url: &str) -> Option<Repository> {
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
        .or_else(|| url.strip_prefix("git@github.com:"))
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))?;

    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    let rest = rest.trim_end_matches('/');
    rest.parse().ok()
}
