use anyhow::{bail, Result};

use crate::docker::SecretSet;
use crate::runner::{CommandRunner, SystemRunner};

pub fn run(env: Option<String>, cmd: Vec<String>) -> Result<()> {
    if cmd.is_empty() {
        bail!("No command provided.");
    }

    let (_, secrets) = super::load_secrets(env.as_deref())?;

    // Secrets exist only in this process and the child's environment from here.
    execute(&cmd, &secrets, &SystemRunner)
}

/// Run `cmd` with `secrets` layered on top of the inherited environment.
pub fn execute(cmd: &[String], secrets: &SecretSet, runner: &dyn CommandRunner) -> Result<()> {
    let Some((program, args)) = cmd.split_first() else {
        bail!("No command provided.");
    };

    runner.run_command(program, args, Some(secrets))?;
    Ok(())
}
