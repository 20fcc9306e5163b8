pub mod docker;
pub mod run;

use anyhow::{Context, Result};

use crate::auth;
use crate::config::{self, Config};
use crate::docker::SecretSet;
use crate::dotenv;
use crate::error::KeywayError;
use crate::repo;
use crate::ui;
use crate::vault::{HttpVault, Vault};

/// Offered when the vault cannot list environments for the repository.
const FALLBACK_ENVIRONMENTS: &[&str] = &["development", "staging", "production"];

/// Shared front half of `docker` and `run`: config, repository, token,
/// environment choice, then the parsed secret set.
pub(crate) fn load_secrets(env_flag: Option<&str>) -> Result<(Config, SecretSet)> {
    let root = config::project_root()?;
    let cfg = config::load(&root)?;

    let repo = repo::detect(&root)?;
    let token = auth::ensure_token()?;
    let vault = HttpVault::new(&cfg.api_url, token)?;

    let environment = resolve_environment(
        env_flag,
        &cfg.default_environment,
        ui::is_interactive(),
        &vault,
        &repo,
        ui::select_stdin,
    )?;
    ui::step(&format!("Environment: {}", environment));

    let secrets = fetch_secrets(&vault, &repo, &environment)?;
    Ok((cfg, secrets))
}

/// `--env` wins; otherwise prompt when interactive, else fall back to `default_env`.
pub(crate) fn resolve_environment<F>(
    explicit: Option<&str>,
    default_env: &str,
    interactive: bool,
    vault: &dyn Vault,
    repo: &str,
    select: F,
) -> Result<String, KeywayError>
where
    F: FnOnce(&str, &[String]) -> Result<String, KeywayError>,
{
    if let Some(env) = explicit {
        return Ok(env.to_string());
    }
    if !interactive {
        return Ok(default_env.to_string());
    }

    let mut environments = match vault.environments(repo) {
        Ok(envs) if !envs.is_empty() => envs,
        Ok(_) => fallback_environments(),
        Err(e) => {
            tracing::debug!(error = %e, "could not list environments, using defaults");
            fallback_environments()
        }
    };

    if let Some(idx) = environments.iter().position(|e| e == default_env) {
        environments.swap(0, idx);
    }

    select("Environment:", &environments)
}

fn fallback_environments() -> Vec<String> {
    FALLBACK_ENVIRONMENTS.iter().map(|e| e.to_string()).collect()
}

pub(crate) fn fetch_secrets(vault: &dyn Vault, repo: &str, environment: &str) -> Result<SecretSet> {
    let content = vault
        .pull_secrets(repo, environment)
        .with_context(|| format!("Failed to fetch secrets for '{}'", environment))?;

    let secrets = dotenv::parse(&content);
    ui::success(&format!("Injecting {} secrets", secrets.len()));
    Ok(secrets)
}
