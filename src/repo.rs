use std::path::Path;
use std::process::Command;

use crate::error::KeywayError;

/// Resolve `owner/repo` from the `origin` remote of the git checkout at `root`.
pub fn detect(root: &Path) -> Result<String, KeywayError> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(root)
        .output()
        .map_err(|e| {
            tracing::debug!(error = %e, "failed to run git");
            KeywayError::NotARepository
        })?;

    if !output.status.success() {
        return Err(KeywayError::NotARepository);
    }

    let url = String::from_utf8_lossy(&output.stdout);
    let repo = parse_github_remote(url.trim()).ok_or(KeywayError::NotARepository)?;
    tracing::debug!(%repo, "detected repository");
    Ok(repo)
}

/// Extract `owner/repo` from a GitHub remote URL (https, scp-style or ssh://).
pub fn parse_github_remote(url: &str) -> Option<String> {
    let path = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
        .or_else(|| url.strip_prefix("git@github.com:"))
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))?;

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let (owner, name) = path.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(format!("{}/{}", owner, name))
}
