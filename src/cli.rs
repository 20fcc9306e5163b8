use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "keyway",
    about = "Inject secrets from your Keyway vault into Docker and other commands.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run Docker or Docker Compose with vault secrets injected.
    ///
    /// `docker run`/`create` (also `docker container run`/`create`): secrets become
    /// -e KEY=VALUE flags placed before the image.
    /// `docker compose run`: secrets become -e flags after `run`.
    /// Other `docker compose` commands: secrets go to a temporary --env-file.
    /// Your own -e flags take precedence over vault secrets for `docker run`.
    /// Other docker subcommands are passed through without secrets.
    #[command(after_help = "Examples:\n  \
        keyway docker --env production run -p 8080:8080 myapp:latest\n  \
        keyway docker --env staging compose up -d\n  \
        keyway docker run --rm alpine env")]
    Docker {
        /// Vault environment to pull secrets from (prompted for when omitted).
        #[arg(short = 'e', long = "env", value_name = "NAME")]
        env: Option<String>,

        /// Docker subcommand and its arguments, passed through untouched.
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "SUBCOMMAND [ARGS]..."
        )]
        args: Vec<String>,
    },

    /// Run any command with vault secrets in its environment.
    Run {
        /// Vault environment to pull secrets from (prompted for when omitted).
        #[arg(short = 'e', long = "env", value_name = "NAME")]
        env: Option<String>,

        /// Command and arguments to run (everything after --).
        #[arg(last = true, required = true)]
        cmd: Vec<String>,
    },
}
