use std::path::Path;

use anyhow::{Context, Result};

use crate::docker::{build_compose, build_run, RewrittenCommand, SecretSet};
use crate::error::KeywayError;
use crate::runner::{CommandRunner, SystemRunner};
use crate::ui;

pub fn run(env: Option<String>, args: Vec<String>) -> Result<()> {
    let (subcommand, docker_args) = args
        .split_first()
        .context("docker subcommand required (e.g. 'run' or 'compose')")?;

    let (cfg, secrets) = super::load_secrets(env.as_deref())?;

    execute(
        &cfg.docker_binary,
        subcommand,
        docker_args,
        &secrets,
        &SystemRunner,
    )?;
    Ok(())
}

/// Rewrite the docker invocation and run it exactly once.
/// Any env file lives until the process has exited, then is removed.
pub fn execute(
    docker: &str,
    subcommand: &str,
    args: &[String],
    secrets: &SecretSet,
    runner: &dyn CommandRunner,
) -> Result<(), KeywayError> {
    execute_in(
        docker,
        subcommand,
        args,
        secrets,
        &std::env::temp_dir(),
        runner,
    )
}

/// Like [`execute`], with the compose env file created in `env_dir`.
/// If the env file cannot be written, nothing is launched.
pub fn execute_in(
    docker: &str,
    subcommand: &str,
    args: &[String],
    secrets: &SecretSet,
    env_dir: &Path,
    runner: &dyn CommandRunner,
) -> Result<(), KeywayError> {
    let rewritten = rewrite(subcommand, args, secrets, env_dir)?;
    let result = runner.run_command(docker, &rewritten.args, None);
    drop(rewritten);
    result
}

fn rewrite(
    subcommand: &str,
    args: &[String],
    secrets: &SecretSet,
    env_dir: &Path,
) -> Result<RewrittenCommand, KeywayError> {
    match (subcommand, args.split_first()) {
        ("compose", _) => build_compose(args, secrets, env_dir),
        ("run" | "create", _) => Ok(RewrittenCommand::from_args(build_run(
            subcommand, args, secrets,
        ))),
        // `docker container run|create` is the long spelling of the same command.
        ("container", Some((action, rest))) if action == "run" || action == "create" => {
            let mut out = vec![subcommand.to_string()];
            out.extend(build_run(action, rest, secrets));
            Ok(RewrittenCommand::from_args(out))
        }
        _ => {
            if !secrets.is_empty() {
                ui::warn(&format!(
                    "'docker {}' does not start a container; no secrets injected",
                    subcommand
                ));
            }
            let mut passthrough = Vec::with_capacity(args.len() + 1);
            passthrough.push(subcommand.to_string());
            passthrough.extend_from_slice(args);
            Ok(RewrittenCommand::from_args(passthrough))
        }
    }
}
