use std::collections::HashMap;
use std::process::Command;

use crate::error::KeywayError;

/// Launches the wrapped binary. Commands only talk to this trait so tests can
/// record invocations instead of spawning processes.
pub trait CommandRunner {
    /// Run `program` with `args` and block until it exits.
    /// `env`, when given, is layered on top of the inherited environment.
    fn run_command(
        &self,
        program: &str,
        args: &[String],
        env: Option<&HashMap<String, String>>,
    ) -> Result<(), KeywayError>;
}

/// Spawns real subprocesses with inherited stdio.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run_command(
        &self,
        program: &str,
        args: &[String],
        env: Option<&HashMap<String, String>>,
    ) -> Result<(), KeywayError> {
        let mut command = Command::new(program);
        command.args(args);

        if let Some(env) = env {
            command.envs(env);
        }

        tracing::debug!(program, argc = args.len(), "spawning");
        let status = command.status().map_err(|source| KeywayError::Spawn {
            program: program.to_string(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(KeywayError::CommandFailed {
                program: program.to_string(),
                code: status.code(),
            })
        }
    }
}
