//! Repository identity from the `origin` remote

use crate::error::{LinkError, LinkResult};
use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// GitHub owner and repository name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIdentity {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Parse owner/repo from a remote URL
///
/// Accepted forms:
/// - `https://github.com/<owner>/<repo>(.git)`
/// - `git@github.com:<owner>/<repo>(.git)`
/// - `http://<proxy>/git/<owner>/<repo>`
pub fn parse_remote_url(url: &str) -> LinkResult<RepoIdentity> {
    let url = url.trim();
    let unsupported = || LinkError::UnsupportedRemote(url.to_string());

    let path = if url.contains("github.com") {
        if url.starts_with("git@") {
            url.split_once(':').map(|(_, rest)| rest)
        } else {
            url.split_once("github.com/").map(|(_, rest)| rest)
        }
    } else {
        url.split_once("/git/").map(|(_, rest)| rest)
    }
    .ok_or_else(unsupported)?;

    let mut parts = path.split('/').filter(|p| !p.is_empty());
    let owner = parts.next().ok_or_else(unsupported)?;
    let repo = parts.next().ok_or_else(unsupported)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return Err(unsupported());
    }

    Ok(RepoIdentity {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// Run `git remote get-url origin` in `root`
pub fn read_origin_url(root: &Path) -> LinkResult<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["remote", "get-url", "origin"])
        .output()
        .map_err(|e| LinkError::GitRemote(format!("failed to run git: {}", e)))?;

    if !output.status.success() {
        return Err(LinkError::GitRemote(format!(
            "{} (is {} a git repository?)",
            String::from_utf8_lossy(&output.stderr).trim(),
            root.display()
        )));
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    debug!(remote = %url, "Read origin remote");
    Ok(url)
}

/// Identity of the repository at `root`
pub fn repo_identity(root: &Path) -> LinkResult<RepoIdentity> {
    parse_remote_url(&read_origin_url(root)?)
}
